//! Integration tests for the recipe browser facade

mod helpers;

use helpers::{
    browser_with_store, meal, setup_browser, setup_store, MockMealDb, PNG_HEADER,
    UNREACHABLE_BASE_URL,
};
use larder_browser::services::{BrowserError, ImageFile, UploadForm, UploadState};
use larder_common::Recipe;

fn form(name: &str, cuisine: &str) -> UploadForm {
    UploadForm {
        name: name.to_string(),
        cuisine: cuisine.to_string(),
        ingredients: "1 onion\n2 carrots".to_string(),
        instructions: "Chop and simmer for an hour.".to_string(),
        image: Some(ImageFile::from_bytes("dish.png", PNG_HEADER.to_vec())),
    }
}

#[tokio::test]
async fn test_listed_recipes_resolve_from_cache() {
    let mock = MockMealDb::start(vec![meal("52771", "Arrabiata", "Italian")]).await;
    let browser = setup_browser(&mock.base_url).await;

    let cards = browser.search("arrabiata").await.unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(browser.aggregator().cached_count().await, 1);

    let recipe = browser.resolve_recipe("52771", false).await.unwrap();
    assert_eq!(recipe.id(), "52771");
    assert_eq!(mock.lookups(), 0);
}

#[tokio::test]
async fn test_uncached_recipe_is_looked_up() {
    let mock = MockMealDb::start(vec![meal("52771", "Arrabiata", "Italian")]).await;
    let browser = setup_browser(&mock.base_url).await;

    let detail = browser.recipe_detail("52771", false).await.unwrap();

    assert_eq!(detail.title, "Arrabiata");
    assert_eq!(mock.lookups(), 1);
}

#[tokio::test]
async fn test_unknown_recipe_is_not_found() {
    let mock = MockMealDb::start(vec![]).await;
    let browser = setup_browser(&mock.base_url).await;

    assert!(matches!(
        browser.recipe_detail("1", false).await,
        Err(BrowserError::NotFound(_))
    ));
    assert!(matches!(
        browser.recipe_detail("recipe_1_abc", true).await,
        Err(BrowserError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_blank_search_lists_all_without_recording() {
    let mock = MockMealDb::start(vec![
        meal("1", "Apam balik", "Malaysian"),
        meal("2", "Beef Wellington", "British"),
    ])
    .await;
    let browser = setup_browser(&mock.base_url).await;

    let cards = browser.search("   ").await.unwrap();

    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].title, "Apam balik");
    assert!(browser.recent_searches().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_matches_uploaded_recipes_by_cuisine_text() {
    let mock = MockMealDb::start(vec![meal("1", "Thai Green Curry", "Thai")]).await;
    let browser = setup_browser(&mock.base_url).await;
    browser.upload(form("Pad See Ew", "Thai")).await.unwrap();
    browser.upload(form("Shepherd's Pie", "British")).await.unwrap();

    let cards = browser.search("thai").await.unwrap();

    let titles: Vec<&str> = cards.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Thai Green Curry", "Pad See Ew"]);
    assert!(!cards[0].is_uploaded);
    assert!(cards[1].is_uploaded);
}

#[tokio::test]
async fn test_cuisine_filter_includes_uploads_case_insensitively() {
    let mock = MockMealDb::start(vec![
        meal("1", "Lasagne", "Italian"),
        meal("2", "Kedgeree", "British"),
    ])
    .await;
    let browser = setup_browser(&mock.base_url).await;
    browser.upload(form("Nonna's Ragu", "italian")).await.unwrap();

    let cards = browser.filter_by_cuisine("Italian").await.unwrap();

    let titles: Vec<&str> = cards.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Lasagne", "Nonna's Ragu"]);
}

#[tokio::test]
async fn test_uploaded_recipe_can_be_favorited() {
    let mock = MockMealDb::start(vec![]).await;
    let browser = setup_browser(&mock.base_url).await;
    let recipe = browser.upload(form("Stew", "Irish")).await.unwrap();

    assert!(browser.toggle_favorite(&recipe.id, true).await.unwrap());

    let favorites = browser.favorite_cards().await.unwrap();
    assert_eq!(favorites.len(), 1);
    assert!(favorites[0].is_uploaded);

    let uploads = browser.uploaded_cards().await.unwrap();
    assert!(uploads[0].is_favorite);

    let stored = browser.store().favorites().await.unwrap();
    assert!(matches!(&stored[0], Recipe::Local(local) if local.id == recipe.id));

    assert!(!browser.toggle_favorite(&recipe.id, true).await.unwrap());
    assert!(browser.favorite_cards().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_uploads_are_listed_most_recent_first() {
    let mock = MockMealDb::start(vec![]).await;
    let browser = setup_browser(&mock.base_url).await;

    browser.upload(form("First", "French")).await.unwrap();
    browser.upload(form("Second", "French")).await.unwrap();

    let titles: Vec<String> = browser
        .uploaded_cards()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.title)
        .collect();
    assert_eq!(titles, vec!["Second", "First"]);
    assert_eq!(browser.upload_state(), UploadState::Collecting);
}

#[tokio::test]
async fn test_favorites_work_while_remote_is_down() {
    let mock = MockMealDb::start(vec![meal("52771", "Arrabiata", "Italian")]).await;
    let store = setup_store().await;
    let online = browser_with_store(&mock.base_url, store.clone());
    assert!(online.toggle_favorite("52771", false).await.unwrap());

    let offline = browser_with_store(UNREACHABLE_BASE_URL, store);

    let favorites = offline.favorite_cards().await.unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].title, "Arrabiata");

    let detail = offline.recipe_detail("52771", false).await.unwrap();
    assert_eq!(detail.title, "Arrabiata");
    assert_eq!(detail.ingredient_lines, vec!["1 pinch salt"]);

    assert!(!offline.toggle_favorite("52771", false).await.unwrap());
    assert!(offline.favorite_cards().await.unwrap().is_empty());
    assert!(!offline.store().is_favorite("52771").await.unwrap());
}

#[tokio::test]
async fn test_unfavorited_remote_recipe_needs_the_remote() {
    let browser = setup_browser(UNREACHABLE_BASE_URL).await;

    assert!(matches!(
        browser.recipe_detail("52771", false).await,
        Err(BrowserError::Remote(_))
    ));
    assert!(matches!(
        browser.toggle_favorite("52771", false).await,
        Err(BrowserError::Remote(_))
    ));
}
