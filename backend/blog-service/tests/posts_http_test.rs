#[macro_use]
mod common;

use actix_web::{
    http::{header, StatusCode},
    test,
};
use serde_json::{json, Value};

use blog_service::db::{PostFilter, PostRepo};
use common::{as_user, location, TestContext};

#[actix_web::test]
async fn create_post_redirects_to_profile_and_shows_in_feeds() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let before = ctx.store.count_posts(PostFilter::All).await.unwrap();

    let req = test::TestRequest::post()
        .uri("/create/")
        .insert_header(as_user(&ctx.author))
        .set_json(json!({ "text": "Brand new post", "group": ctx.group.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/leo/");

    assert_eq!(ctx.store.count_posts(PostFilter::All).await.unwrap(), before + 1);

    let req = test::TestRequest::get().uri("/group/cats/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["title"], "Cats");
    assert_eq!(body["page_obj"]["items"][0]["text"], "Brand new post");

    let req = test::TestRequest::get().uri("/profile/leo/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count_posts"], 1);
    assert_eq!(body["page_obj"]["items"][0]["group"]["slug"], "cats");
    assert_eq!(body["following"], false);
}

#[actix_web::test]
async fn anonymous_create_redirects_to_login() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/create/")
        .set_json(json!({ "text": "Sneaky" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=/create/");
    assert_eq!(ctx.store.count_posts(PostFilter::All).await.unwrap(), 0);
}

#[actix_web::test]
async fn login_redirect_does_not_depend_on_the_body() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/create/")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload("text=Sneaky")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=/create/");

    let post = ctx.seed_post(&ctx.author, "Mine", None).await;
    let uri = format!("/posts/{}/edit/", post.id);
    let req = test::TestRequest::post().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/auth/login/?next={}", uri));

    assert_eq!(ctx.store.count_posts(PostFilter::All).await.unwrap(), 1);
}

#[actix_web::test]
async fn unreadable_body_from_author_is_a_bad_request() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/create/")
        .insert_header(as_user(&ctx.author))
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload("text=Hello")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ctx.store.count_posts(PostFilter::All).await.unwrap(), 0);
}

#[actix_web::test]
async fn blank_text_is_rejected_with_form_errors() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/create/")
        .insert_header(as_user(&ctx.author))
        .set_json(json!({ "text": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["is_edit"], false);
    assert_eq!(body["errors"][0], "text: Post text is required");
    assert_eq!(ctx.store.count_posts(PostFilter::All).await.unwrap(), 0);
}

#[actix_web::test]
async fn unknown_group_is_a_validation_error() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/create/")
        .insert_header(as_user(&ctx.author))
        .set_json(json!({ "text": "Lost", "group": 9999 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ctx.store.count_posts(PostFilter::All).await.unwrap(), 0);
}

#[actix_web::test]
async fn author_edits_post_in_place() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    let post = ctx.seed_post(&ctx.author, "Original", None).await;

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/edit/", post.id))
        .insert_header(as_user(&ctx.author))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["is_edit"], true);
    assert_eq!(body["form"]["text"], "Original");

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .insert_header(as_user(&ctx.author))
        .set_json(json!({ "text": "Edited", "group": ctx.group.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let stored = ctx.store.find_post(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Edited");
    assert_eq!(stored.created_at, post.created_at);
    assert_eq!(stored.group.map(|g| g.id), Some(ctx.group.id));
}

#[actix_web::test]
async fn non_author_edit_redirects_to_detail() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    let post = ctx.seed_post(&ctx.author, "Mine", None).await;

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .insert_header(as_user(&ctx.reader))
        .set_json(json!({ "text": "Hijacked" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/edit/", post.id))
        .insert_header(as_user(&ctx.reader))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    // an empty body changes nothing about where a non-author is sent
    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .insert_header(as_user(&ctx.reader))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let stored = ctx.store.find_post(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Mine");
}

#[actix_web::test]
async fn detail_and_missing_pages() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    let post = ctx.seed_post(&ctx.author, "Hello", Some(ctx.group.id)).await;
    ctx.seed_post(&ctx.author, "Second", None).await;

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/", post.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["title"], "Cats");
    assert_eq!(body["post"]["author"]["username"], "leo");
    assert_eq!(body["author_posts"], 2);
    assert_eq!(body["form"]["text"], "");

    for uri in ["/posts/9999/", "/group/nope/", "/profile/nobody/"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[actix_web::test]
async fn thirteen_posts_paginate_ten_and_three() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);
    for n in 0..13 {
        ctx.seed_post(&ctx.author, &format!("post {}", n), Some(ctx.group.id))
            .await;
    }

    let page = |uri: &'static str| test::TestRequest::get().uri(uri).to_request();

    let body: Value = test::call_and_read_body_json(&app, page("/")).await;
    assert_eq!(body["page_obj"]["items"].as_array().unwrap().len(), 10);
    assert_eq!(body["page_obj"]["items"][0]["text"], "post 12");
    assert_eq!(body["page_obj"]["num_pages"], 2);

    let body: Value = test::call_and_read_body_json(&app, page("/?page=2")).await;
    assert_eq!(body["page_obj"]["items"].as_array().unwrap().len(), 3);
    assert_eq!(body["page_obj"]["number"], 2);

    let body: Value = test::call_and_read_body_json(&app, page("/?page=99")).await;
    assert_eq!(body["page_obj"]["number"], 2);
    assert_eq!(body["page_obj"]["items"].as_array().unwrap().len(), 3);

    let body: Value = test::call_and_read_body_json(&app, page("/?page=abc")).await;
    assert_eq!(body["page_obj"]["number"], 1);

    let body: Value = test::call_and_read_body_json(&app, page("/group/cats/?page=2")).await;
    assert_eq!(body["page_obj"]["items"].as_array().unwrap().len(), 3);

    let body: Value = test::call_and_read_body_json(&app, page("/profile/leo/?page=2")).await;
    assert_eq!(body["page_obj"]["items"].as_array().unwrap().len(), 3);
    assert_eq!(body["count_posts"], 13);
}

#[actix_web::test]
async fn health_endpoints_report_ok() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/api/v1/health/live").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
}
