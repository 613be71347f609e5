// Browse-view controller: owns the full listing set and the active filter

use crate::filter::{FilterSpec, filter};
use crate::models::Listing;
use crate::supabase::ListingStore;

/// What the browse view should render.
///
/// `Loading` (nothing fetched yet) and `Ready` with zero matches are
/// different situations and render differently; `NoData` covers a store
/// that answered successfully with zero rows.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseState {
    Loading,
    NoData,
    Failed(String),
    Ready(Vec<Listing>),
}

pub struct BrowseController {
    spec: FilterSpec,
    state: BrowseState,
}

impl BrowseController {
    pub fn new(spec: FilterSpec) -> Self {
        BrowseController {
            spec,
            state: BrowseState::Loading,
        }
    }

    pub fn state(&self) -> &BrowseState {
        &self.state
    }

    /// Replaces the active filter; the visible subset is re-derived on the
    /// next call to [`visible`](Self::visible).
    pub fn set_spec(&mut self, spec: FilterSpec) {
        self.spec = spec;
    }

    pub async fn load<S: ListingStore + ?Sized>(&mut self, store: &S) {
        match store.fetch_all().await {
            Ok(rows) if rows.is_empty() => {
                self.state = BrowseState::NoData;
            }
            Ok(rows) => {
                self.state = BrowseState::Ready(rows);
            }
            Err(e) => {
                tracing::error!("Failed to load listings: {}", e);
                self.state = BrowseState::Failed(format!("Failed to load listings: {}", e));
            }
        }
    }

    /// The filtered subset, recomputed from the full set on every call.
    /// Returns None until a successful load.
    pub fn visible(&self) -> Option<Vec<Listing>> {
        match &self.state {
            BrowseState::Ready(all) => Some(filter(all, &self.spec)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Engine, Transmission, User};
    use crate::supabase::StoreError;
    use async_trait::async_trait;

    struct FixedStore {
        listings: Result<Vec<Listing>, ()>,
    }

    #[async_trait]
    impl ListingStore for FixedStore {
        async fn fetch_all(&self) -> Result<Vec<Listing>, StoreError> {
            match &self.listings {
                Ok(rows) => Ok(rows.clone()),
                Err(()) => Err(StoreError::Transport("connection refused".into())),
            }
        }

        async fn fetch_by_id(&self, _id: &str) -> Result<Listing, StoreError> {
            unreachable!("not used by the browse controller")
        }

        async fn create(&self, _draft: &crate::models::NewListing) -> Result<Listing, StoreError> {
            unreachable!("not used by the browse controller")
        }

        async fn update(&self, _listing: &Listing) -> Result<Option<Listing>, StoreError> {
            unreachable!("not used by the browse controller")
        }

        async fn delete_by_id(&self, _id: &str) -> Result<(), StoreError> {
            unreachable!("not used by the browse controller")
        }

        async fn fetch_users(&self) -> Result<Vec<User>, StoreError> {
            unreachable!("not used by the browse controller")
        }

        async fn delete_user(&self, _id: &str) -> Result<(), StoreError> {
            unreachable!("not used by the browse controller")
        }
    }

    fn sample(id: &str, engine: Engine) -> Listing {
        Listing {
            id: id.to_string(),
            name: format!("Car {}", id),
            price: 10000.0,
            engine,
            engine_size: 2.0,
            mileage: 40000,
            transmission: Transmission::Manual,
            color: "Black".to_string(),
            year: 2019,
            description: String::new(),
            images: vec![],
            location: "Cork".to_string(),
        }
    }

    #[test]
    fn a_fresh_controller_is_loading_and_has_nothing_visible() {
        let controller = BrowseController::new(FilterSpec::default());
        assert_eq!(*controller.state(), BrowseState::Loading);
        assert!(controller.visible().is_none());
    }

    #[tokio::test]
    async fn an_empty_store_is_no_data_not_zero_matches() {
        let store = FixedStore { listings: Ok(vec![]) };
        let mut controller = BrowseController::new(FilterSpec::default());
        controller.load(&store).await;
        assert_eq!(*controller.state(), BrowseState::NoData);
        assert!(controller.visible().is_none());
    }

    #[tokio::test]
    async fn zero_matches_after_filtering_is_still_ready() {
        let store = FixedStore {
            listings: Ok(vec![sample("1", Engine::Petrol)]),
        };
        let mut controller = BrowseController::new(FilterSpec {
            engine: Some(Engine::Electric),
            ..FilterSpec::default()
        });
        controller.load(&store).await;

        assert!(matches!(controller.state(), BrowseState::Ready(_)));
        assert_eq!(controller.visible().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn a_transport_failure_is_a_failed_state() {
        let store = FixedStore { listings: Err(()) };
        let mut controller = BrowseController::new(FilterSpec::default());
        controller.load(&store).await;
        assert!(matches!(controller.state(), BrowseState::Failed(_)));
    }

    #[tokio::test]
    async fn changing_the_spec_rederives_the_visible_subset() {
        let store = FixedStore {
            listings: Ok(vec![sample("1", Engine::Petrol), sample("2", Engine::Electric)]),
        };
        let mut controller = BrowseController::new(FilterSpec::default());
        controller.load(&store).await;
        assert_eq!(controller.visible().unwrap().len(), 2);

        controller.set_spec(FilterSpec {
            engine: Some(Engine::Electric),
            ..FilterSpec::default()
        });
        let visible = controller.visible().unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "2");
    }
}
