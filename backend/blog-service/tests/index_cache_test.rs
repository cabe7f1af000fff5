#[macro_use]
mod common;

use actix_web::test;
use serde_json::Value;
use std::time::Duration;

use blog_service::cache::{index_key, PageCache};
use blog_service::db::PostRepo;
use common::TestContext;

#[actix_web::test]
async fn index_is_served_from_cache_until_cleared() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    let post = ctx.seed_post(&ctx.author, "Cached post", None).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let first = test::call_and_read_body(&app, req).await;

    assert!(ctx.store.delete_post(post.id).await.unwrap());

    let req = test::TestRequest::get().uri("/").to_request();
    let second = test::call_and_read_body(&app, req).await;
    assert_eq!(first, second);

    ctx.cache.clear().await.unwrap();

    let req = test::TestRequest::get().uri("/").to_request();
    let third = test::call_and_read_body(&app, req).await;
    assert_ne!(first, third);
}

#[actix_web::test]
async fn new_post_shows_up_once_the_ttl_has_elapsed() {
    tokio::time::pause();
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/").to_request();
    let before = test::call_and_read_body(&app, req).await;

    ctx.seed_post(&ctx.author, "Fresh", None).await;

    tokio::time::advance(Duration::from_secs(19)).await;
    let req = test::TestRequest::get().uri("/").to_request();
    assert_eq!(test::call_and_read_body(&app, req).await, before);

    tokio::time::advance(Duration::from_secs(1)).await;
    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["page_obj"]["items"][0]["text"], "Fresh");
}

#[actix_web::test]
async fn invalidating_the_index_key_forces_a_rerender() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["page_obj"]["items"].as_array().unwrap().len(), 0);

    ctx.seed_post(&ctx.author, "Fresh", None).await;
    ctx.cache.invalidate(&index_key(None)).await.unwrap();

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["page_obj"]["items"][0]["text"], "Fresh");
}

#[actix_web::test]
async fn each_page_value_has_its_own_entry() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/").to_request();
    let before = test::call_and_read_body(&app, req).await;

    ctx.seed_post(&ctx.author, "Fresh", None).await;

    let req = test::TestRequest::get().uri("/").to_request();
    assert_eq!(test::call_and_read_body(&app, req).await, before);

    let req = test::TestRequest::get().uri("/?page=1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["page_obj"]["items"][0]["text"], "Fresh");
    assert_eq!(ctx.cache.len(), 2);
}
