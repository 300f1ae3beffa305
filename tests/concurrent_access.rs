//! Shared-service behavior under concurrent readers and writers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pantry::application::options::ReadRecipesOptions;
use pantry::application::recipes::RecipeQueryService;
use pantry::application::repos::{RecipesRepo, RepoError};
use pantry::domain::recipes::{NewRecipe, Recipe};
use pantry::infra::memory::InMemoryRecipeStore;
use tokio::sync::Notify;

/// Wraps the in-memory store, counting full loads and optionally parking them.
struct GatedStore {
    inner: InMemoryRecipeStore,
    loads: AtomicUsize,
    load_delay: Option<Duration>,
    write_gate: Option<Arc<Notify>>,
}

impl GatedStore {
    fn new(inner: InMemoryRecipeStore) -> Self {
        Self {
            inner,
            loads: AtomicUsize::new(0),
            load_delay: None,
            write_gate: None,
        }
    }
}

#[async_trait]
impl RecipesRepo for GatedStore {
    async fn load_all(&self) -> Result<Vec<Recipe>, RepoError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.load_delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.load_all().await
    }

    async fn find_by_id(&self, id: u64) -> Result<Recipe, RepoError> {
        self.inner.find_by_id(id).await
    }

    async fn create(&self, params: NewRecipe) -> Result<Recipe, RepoError> {
        self.inner.create(params).await
    }

    async fn update(&self, recipe: Recipe) -> Result<Recipe, RepoError> {
        self.inner.update(recipe).await
    }

    async fn delete(&self, id: u64) -> Result<(), RepoError> {
        self.inner.delete(id).await
    }

    async fn set_pending(&self, id: u64, pending: bool) -> Result<(), RepoError> {
        if let Some(gate) = &self.write_gate {
            gate.notified().await;
        }
        self.inner.set_pending(id, pending).await
    }
}

fn seeded(count: u64) -> InMemoryRecipeStore {
    let recipes = (1..=count)
        .map(|id| Recipe {
            id,
            title: format!("Recipe {id}"),
            pending: id % 3 == 0,
            ..Default::default()
        })
        .collect();
    InMemoryRecipeStore::from_recipes(recipes).expect("seed store")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_readers_see_consistent_role_views() {
    let service = RecipeQueryService::new(Arc::new(GatedStore::new(seeded(30))));

    let mut handles = Vec::new();
    for task in 0..32 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            let is_admin = task % 2 == 0;
            let page = service
                .read_recipes(&ReadRecipesOptions::new(is_admin, "", 1, 100))
                .await
                .expect("read recipes");
            (is_admin, page.items)
        }));
    }

    for handle in handles {
        let (is_admin, recipes) = handle.await.expect("reader task");
        if is_admin {
            assert_eq!(recipes.len(), 30);
        } else {
            assert_eq!(recipes.len(), 20);
            assert!(recipes.iter().all(|recipe| !recipe.pending));
        }
        let ids: Vec<u64> = recipes.iter().map(|recipe| recipe.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(ids, sorted);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_misses_may_reload_redundantly() {
    let store = Arc::new(GatedStore {
        load_delay: Some(Duration::from_millis(50)),
        ..GatedStore::new(seeded(5))
    });
    let service = RecipeQueryService::new(store.clone());

    let first = tokio::spawn({
        let service = service.clone();
        async move { service.read_all_recipes(true).await }
    });
    let second = tokio::spawn({
        let service = service.clone();
        async move { service.read_all_recipes(true).await }
    });

    let first = first.await.expect("task").expect("read");
    let second = second.await.expect("task").expect("read");

    assert_eq!(first, second);
    let loads = store.loads.load(Ordering::SeqCst);
    assert!((1..=2).contains(&loads), "unexpected load count {loads}");
    assert!(service.cache().is_valid());

    service.read_all_recipes(false).await.expect("cached read");
    assert_eq!(store.loads.load(Ordering::SeqCst), loads);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn read_between_invalidate_and_write_can_cache_pre_write_data() {
    let gate = Arc::new(Notify::new());
    let store = Arc::new(GatedStore {
        write_gate: Some(gate.clone()),
        ..GatedStore::new(seeded(2))
    });
    let service = RecipeQueryService::new(store.clone());
    service.read_all_recipes(true).await.expect("warm cache");

    let writer = tokio::spawn({
        let service = service.clone();
        async move { service.set_pending(1, true).await }
    });

    // Wait until the writer has invalidated and is parked on the gate.
    while service.cache().is_valid() {
        tokio::task::yield_now().await;
    }

    let racing = service.read_all_recipes(false).await.expect("racing read");
    assert!(racing.iter().any(|recipe| recipe.id == 1));

    gate.notify_one();
    writer.await.expect("writer task").expect("set pending");

    // The racing read reinstalled the pre-write snapshot; it stays until the next mutation.
    assert!(service.cache().is_valid());
    let stale = service.read_all_recipes(false).await.expect("stale read");
    assert!(stale.iter().any(|recipe| recipe.id == 1));

    service.cache().invalidate();
    let fresh = service.read_all_recipes(false).await.expect("fresh read");
    assert!(fresh.iter().all(|recipe| recipe.id != 1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn interleaved_writes_never_leave_a_stale_snapshot_behind() {
    let store = Arc::new(GatedStore::new(InMemoryRecipeStore::new()));
    let service = RecipeQueryService::new(store);

    let mut writers = Vec::new();
    for n in 0..16 {
        let service = service.clone();
        writers.push(tokio::spawn(async move {
            service
                .create_recipe(NewRecipe {
                    title: format!("Recipe {n}"),
                    ..Default::default()
                })
                .await
        }));
    }
    let mut readers = Vec::new();
    for _ in 0..16 {
        let service = service.clone();
        readers.push(tokio::spawn(async move {
            service.read_all_recipes(true).await
        }));
    }

    for writer in writers {
        writer.await.expect("writer task").expect("create");
    }
    for reader in readers {
        reader.await.expect("reader task").expect("read");
    }

    // A reader racing the last create may have installed a partial list.
    service.cache().invalidate();
    assert_eq!(service.read_all_recipes(true).await.expect("read").len(), 16);
}
