use crate::api::RentalApi;
use crate::error::{Result, ValidationError};
use crate::models::{PropertyId, ToggleAction};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Favorited property ids of the signed-in user.
/// State only changes once the server has answered. `toggle` borrows the set
/// mutably, so a second toggle cannot start while one is in flight.
#[derive(Debug, Default)]
pub struct Favorites {
    ids: BTreeSet<PropertyId>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, api: &dyn RentalApi) -> Result<()> {
        let favorites = api.list_favorites().await.map_err(|e| {
            warn!("Failed to fetch favorites: {}", e);
            e
        })?;
        self.ids = favorites.into_iter().map(|f| f.property.id).collect();
        info!("Loaded {} favorites", self.ids.len());
        Ok(())
    }

    pub fn ids(&self) -> &BTreeSet<PropertyId> {
        &self.ids
    }

    pub fn contains(&self, id: PropertyId) -> bool {
        self.ids.contains(&id)
    }

    /// Flip `id` on the server and mirror the answer. Returns the new favorited state.
    pub async fn toggle(&mut self, api: &dyn RentalApi, authenticated: bool, id: PropertyId) -> Result<bool> {
        if !authenticated {
            return Err(ValidationError::LoginRequired.into());
        }
        let result = api.toggle_favorite(id).await.map_err(|e| {
            warn!("Failed to toggle favorite {}: {}", id, e);
            e
        })?;

        match result.action {
            ToggleAction::Added => self.ids.insert(id),
            ToggleAction::Removed => self.ids.remove(&id),
        };
        info!(
            "{} property {}",
            if result.action.is_favorite() { "Added to favorites:" } else { "Removed from favorites:" },
            id
        );
        Ok(result.action.is_favorite())
    }
}

/// Favorites picked before logging in. Kept in memory only.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LocalFavorites {
    ids: BTreeSet<PropertyId>,
}

impl LocalFavorites {
    pub fn toggle(&mut self, id: PropertyId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn ids(&self) -> &BTreeSet<PropertyId> {
        &self.ids
    }

    /// After login: toggle every local id the server does not have yet, then forget them.
    /// Ids that fail stay local so a later merge can retry them.
    pub async fn merge_into(&mut self, api: &dyn RentalApi, favorites: &mut Favorites) -> Result<usize> {
        let mut merged = 0;
        let pending: Vec<PropertyId> = self.ids.iter().copied().filter(|id| !favorites.contains(*id)).collect();
        for id in pending {
            favorites.toggle(api, true, id).await?;
            self.ids.remove(&id);
            merged += 1;
        }
        self.ids.clear();
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{property, FakeApi};
    use crate::error::AppError;

    #[tokio::test]
    async fn toggling_twice_restores_state() {
        let api = FakeApi::new().with_favorites(&[1]);
        let mut favorites = Favorites::new();
        favorites.load(&api).await.unwrap();
        assert!(favorites.contains(1));

        assert!(!favorites.toggle(&api, true, 1).await.unwrap());
        assert!(!favorites.contains(1));
        assert!(favorites.toggle(&api, true, 1).await.unwrap());
        assert!(favorites.contains(1));
        assert_eq!(api.favorites(), BTreeSet::from([1]));
    }

    #[tokio::test]
    async fn anonymous_toggle_never_calls_api() {
        let api = FakeApi::new();
        let mut favorites = Favorites::new();
        let err = favorites.toggle(&api, false, 4).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::LoginRequired)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_toggle_leaves_state_alone() {
        let api = FakeApi::new();
        api.fail("toggle_favorite");
        let mut favorites = Favorites::new();
        assert!(favorites.toggle(&api, true, 2).await.is_err());
        assert!(!favorites.contains(2));
        assert_eq!(api.calls(), vec!["toggle_favorite"]);
    }

    #[tokio::test]
    async fn each_toggle_is_one_round_trip() {
        let api = FakeApi::new();
        let mut favorites = Favorites::new();
        assert!(favorites.toggle(&api, true, 5).await.unwrap());
        assert!(!favorites.toggle(&api, true, 5).await.unwrap());
        assert_eq!(api.calls(), vec!["toggle_favorite", "toggle_favorite"]);
        assert!(favorites.ids().is_empty());
    }

    #[tokio::test]
    async fn local_favorites_merge_on_login() {
        let api = FakeApi::new()
            .with_properties(vec![property(1, "1", "x"), property(2, "1", "x")])
            .with_favorites(&[1]);
        let mut favorites = Favorites::new();
        favorites.load(&api).await.unwrap();

        let mut local = LocalFavorites::default();
        assert!(local.toggle(1));
        assert!(local.toggle(2));
        assert!(local.toggle(3));
        assert!(!local.toggle(3));

        let merged = local.merge_into(&api, &mut favorites).await.unwrap();
        assert_eq!(merged, 1);
        assert!(local.ids().is_empty());
        assert_eq!(favorites.ids(), &BTreeSet::from([1, 2]));
        assert_eq!(api.favorites(), BTreeSet::from([1, 2]));
    }
}
