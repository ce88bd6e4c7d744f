use super::*;
use shared::{domain::MovieId, error::FetchError};

use crate::test_support::{catalog_item, ScriptedCatalog};

fn dune_payload() -> String {
    let mut item = catalog_item(438631);
    item.title = "Dune".into();
    item.poster_path = Some("/d5NXSklXo0qyIYkgV94XAgMIckC.jpg".into());
    item.release_date = chrono::NaiveDate::from_ymd_opt(2021, 9, 15);
    item.to_payload().expect("payload")
}

#[test]
fn detail_view_is_built_from_navigation_payload() {
    let view = DetailView::from_payload(&dune_payload(), FavoritePolicy::default())
        .expect("payload decodes");

    assert_eq!(view.item().title, "Dune");
    assert!(!view.is_favorite());
    assert_eq!(
        view.poster_url().as_deref(),
        Some("https://image.tmdb.org/t/p/original/d5NXSklXo0qyIYkgV94XAgMIckC.jpg")
    );
    let lines = view.summary_lines();
    assert_eq!(lines[0], "Release Date: 2021-09-15");
    assert_eq!(lines[5], "Vote Count: 1");
}

#[test]
fn garbage_payload_is_rejected() {
    assert!(DetailView::from_payload("{\"id\": 1}", FavoritePolicy::Optimistic).is_err());
}

#[tokio::test]
async fn successful_toggle_confirms_with_notice() {
    let catalog = ScriptedCatalog::default();
    let mut view = DetailView::from_payload(&dune_payload(), FavoritePolicy::Optimistic)
        .expect("payload decodes");

    let outcome = view.toggle_favorite(&catalog).await;

    assert!(view.is_favorite());
    match outcome {
        ToggleOutcome::Confirmed(notice) => {
            assert_eq!(notice.title, "Success");
            assert_eq!(notice.body, "Favorite status updated successfully!");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    view.toggle_favorite(&catalog).await;
    assert!(!view.is_favorite());
    assert_eq!(
        catalog.favorite_calls().await,
        vec![(MovieId(438631), true), (MovieId(438631), false)]
    );
}

#[tokio::test]
async fn optimistic_policy_keeps_flag_after_failure() {
    let catalog = ScriptedCatalog::default();
    catalog
        .fail_favorites(FetchError::new("/account/1/favorite", "HTTP 401 Unauthorized: bad token"))
        .await;
    let mut view = DetailView::new(catalog_item(9), FavoritePolicy::Optimistic);

    let outcome = view.toggle_favorite(&catalog).await;

    assert_eq!(outcome, ToggleOutcome::Failed { reverted: false });
    assert!(view.is_favorite());
}

#[tokio::test]
async fn reconcile_policy_reverts_flag_after_failure() {
    let catalog = ScriptedCatalog::default();
    catalog
        .fail_favorites(FetchError::new("/account/1/favorite", "transport failure: reset"))
        .await;
    let mut view = DetailView::new(catalog_item(9), FavoritePolicy::Reconcile);

    let outcome = view.toggle_favorite(&catalog).await;

    assert_eq!(outcome, ToggleOutcome::Failed { reverted: true });
    assert!(!view.is_favorite());
    assert_eq!(catalog.favorite_calls().await, vec![(MovieId(9), true)]);
}
