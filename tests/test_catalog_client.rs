use mockito::Matcher;
use recipe_browser::{fetch_recipe, search_recipes, BrowserError, CatalogSource, MealDbClient};
use serde_json::json;

fn client_for(server: &mockito::ServerGuard) -> MealDbClient {
    MealDbClient::new(server.url(), None).unwrap()
}

#[tokio::test]
async fn test_search_by_name_returns_records() {
    let mut server = mockito::Server::new_async().await;
    let body = json!({
        "meals": [
            {
                "idMeal": "52795",
                "strMeal": "Chicken Handi",
                "strCategory": "Chicken",
                "strArea": "Indian",
                "strMealThumb": "https://example.com/handi.jpg",
                "strTags": null,
                "strIngredient1": "Chicken",
                "strMeasure1": "1.2 kg"
            },
            {
                "idMeal": "52796",
                "strMeal": "Chicken Alfredo Primavera",
                "strCategory": "Chicken",
                "strArea": "Italian",
                "strMealThumb": "https://example.com/alfredo.jpg",
                "strTags": "Pasta,Meat"
            }
        ]
    });

    let m = server
        .mock("GET", "/search.php")
        .match_query(Matcher::UrlEncoded("s".into(), "chicken".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let cards = search_recipes(&client_for(&server), "chicken").await.unwrap();
    m.assert_async().await;

    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].name, "Chicken Handi");
    assert_eq!(cards[0].tags, None);
    assert_eq!(
        cards[1].tags,
        Some(vec!["Pasta".to_string(), "Meat".to_string()])
    );
}

#[tokio::test]
async fn test_search_without_match_is_empty_not_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/search.php")
        .match_query(Matcher::UrlEncoded("s".into(), "zzzz".into()))
        .with_status(200)
        .with_body(r#"{"meals": null}"#)
        .create_async()
        .await;

    let records = client_for(&server).search_by_name("zzzz").await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_non_success_status_is_http_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/search.php")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("unavailable")
        .create_async()
        .await;

    let result = client_for(&server).search_by_name("soup").await;
    match result {
        Err(BrowserError::HttpError { status }) => assert_eq!(status, 503),
        other => panic!("Expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_lookup_by_id_and_normalize() {
    let mut server = mockito::Server::new_async().await;
    let body = json!({
        "meals": [{
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strCategory": "Chicken",
            "strArea": "Japanese",
            "strInstructions": "Preheat oven.\r\n\r\nBake.",
            "strMealThumb": "https://example.com/teriyaki.jpg",
            "strTags": "Meat,Casserole",
            "strYoutube": "https://www.youtube.com/watch?v=4aZr5hZXP_s",
            "strSource": "",
            "strIngredient1": "soy sauce",
            "strMeasure1": "3/4 cup",
            "strIngredient2": "water",
            "strMeasure2": "1/2 cup",
            "strIngredient3": "",
            "strMeasure3": "",
            "strIngredient4": "brown sugar",
            "strMeasure4": "1/4 cup "
        }]
    });

    let _m = server
        .mock("GET", "/lookup.php")
        .match_query(Matcher::UrlEncoded("i".into(), "52772".into()))
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await;

    let recipe = fetch_recipe(&client_for(&server), "52772").await.unwrap();
    assert_eq!(recipe.id, "52772");
    assert_eq!(recipe.ingredients.len(), 3);
    assert_eq!(recipe.ingredients[2].name, "brown sugar");
    assert_eq!(recipe.ingredients[2].measure, "1/4 cup");
    assert_eq!(recipe.instruction_paragraphs(), vec!["Preheat oven.", "Bake."]);
    assert!(recipe.youtube.is_some());
    assert_eq!(recipe.source, None);
}

#[tokio::test]
async fn test_lookup_of_unknown_id_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/lookup.php")
        .match_query(Matcher::UrlEncoded("i".into(), "1".into()))
        .with_status(200)
        .with_body(r#"{"meals": null}"#)
        .create_async()
        .await;

    let result = fetch_recipe(&client_for(&server), "1").await;
    assert!(matches!(result, Err(BrowserError::NotFoundError(id)) if id == "1"));
}

#[tokio::test]
async fn test_random_sample_issues_independent_requests() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/random.php")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"meals": [{"idMeal": "52771", "strMeal": "Spicy Arrabiata Penne"}]}"#)
        .expect(3)
        .create_async()
        .await;

    let records = client_for(&server).random_sample(3).await.unwrap();
    m.assert_async().await;

    // Same record three times; duplicates are kept
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.id.as_deref() == Some("52771")));
}

#[tokio::test]
async fn test_filter_by_category_and_area() {
    let mut server = mockito::Server::new_async().await;
    let _by_category = server
        .mock("GET", "/filter.php")
        .match_query(Matcher::UrlEncoded("c".into(), "Sea food".into()))
        .with_status(200)
        .with_body(r#"{"meals": [{"idMeal": "1", "strMeal": "Fish pie", "strMealThumb": "x"}]}"#)
        .create_async()
        .await;
    let _by_area = server
        .mock("GET", "/filter.php")
        .match_query(Matcher::UrlEncoded("a".into(), "Canadian".into()))
        .with_status(200)
        .with_body(r#"{"meals": [{"idMeal": "2", "strMeal": "Poutine"}, {"idMeal": "3", "strMeal": "Tourtiere"}]}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let seafood = client.filter_by_category("Sea food").await.unwrap();
    assert_eq!(seafood.len(), 1);

    let canadian = client.filter_by_area("Canadian").await.unwrap();
    assert_eq!(canadian.len(), 2);
    assert_eq!(canadian[1].name.as_deref(), Some("Tourtiere"));
}

#[tokio::test]
async fn test_list_categories() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/list.php")
        .match_query(Matcher::UrlEncoded("c".into(), "list".into()))
        .with_status(200)
        .with_body(r#"{"meals": [{"strCategory": "Beef"}, {"strCategory": "Breakfast"}]}"#)
        .create_async()
        .await;

    let categories = client_for(&server).list_categories().await.unwrap();
    assert_eq!(categories, vec!["Beef", "Breakfast"]);
}

#[tokio::test]
async fn test_unexpected_body_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/search.php")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let result = client_for(&server).search_by_name("x").await;
    assert!(matches!(result, Err(BrowserError::DecodeError(_))));
}
