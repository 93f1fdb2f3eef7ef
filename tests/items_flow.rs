mod common;

use axum::http::{Method, StatusCode, header};
use serde_json::json;

use shopcart_api::store;

// The item protocol end to end: merge-on-add, synchronous total
// recalculation, nested CRUD, and the store-level finders.
#[tokio::test]
async fn add_merge_update_delete_items_flow() -> anyhow::Result<()> {
    let Some((router, orm)) = common::setup().await? else {
        return Ok(());
    };

    let (status, _, cart) = common::request(
        &router,
        Method::POST,
        "/shopcarts",
        Some(json!({"total_price": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let cart_id = cart["id"].as_i64().expect("cart id");

    // First add creates the line; no shopcart_id needed in the body,
    // the path supplies it.
    let (status, headers, item) = common::request(
        &router,
        Method::POST,
        &format!("/shopcarts/{cart_id}/items"),
        Some(json!({"product_id": 7, "name": "Widget", "quantity": 2, "price": 5.0})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let item_id = item["id"].as_i64().expect("item id");
    assert_eq!(item["quantity"], json!(2));
    assert_eq!(item["shopcart_id"], json!(cart_id));
    let location = headers
        .get(header::LOCATION)
        .expect("location header")
        .to_str()?;
    assert_eq!(
        location,
        format!("/shopcarts/{cart_id}/items/{item_id}")
    );

    let (_, _, cart) = common::request(
        &router,
        Method::GET,
        &format!("/shopcarts/{cart_id}"),
        None,
    )
    .await;
    assert_eq!(cart["total_price"], json!(10.0));

    // Adding the same product again merges quantities onto the same row.
    let (status, _, merged) = common::request(
        &router,
        Method::POST,
        &format!("/shopcarts/{cart_id}/items"),
        Some(json!({"product_id": 7, "name": "Widget", "quantity": 3, "price": 5.0})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(merged["id"], json!(item_id));
    assert_eq!(merged["quantity"], json!(5));

    let (_, _, cart) = common::request(
        &router,
        Method::GET,
        &format!("/shopcarts/{cart_id}"),
        None,
    )
    .await;
    assert_eq!(cart["total_price"], json!(25.0));
    assert_eq!(cart["items"].as_array().expect("array").len(), 1);

    // Adding into a missing cart is a 404.
    let (status, _, body) = common::request(
        &router,
        Method::POST,
        "/shopcarts/999999/items",
        Some(json!({"product_id": 7, "name": "Widget", "quantity": 1, "price": 5.0})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(
        body["message"]
            .as_str()
            .expect("message")
            .contains("was not found")
    );

    // The add protocol insists on product_id and a sane quantity up front.
    let (status, _, body) = common::request(
        &router,
        Method::POST,
        &format!("/shopcarts/{cart_id}/items"),
        Some(json!({"name": "Widget", "quantity": 1, "price": 5.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .expect("message")
            .contains("missing required field [product_id]")
    );

    let (status, _, body) = common::request(
        &router,
        Method::POST,
        &format!("/shopcarts/{cart_id}/items"),
        Some(json!({"product_id": 7, "name": "Widget", "quantity": -1, "price": 5.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .expect("message")
            .contains("must be non-negative")
    );

    let (status, _, body) = common::request(
        &router,
        Method::POST,
        &format!("/shopcarts/{cart_id}/items"),
        Some(json!({"product_id": 7, "name": "Widget", "quantity": 2.5, "price": 5.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .expect("message")
            .contains("invalid type for [quantity]")
    );

    // A different product gets its own line.
    let (status, _, gadget) = common::request(
        &router,
        Method::POST,
        &format!("/shopcarts/{cart_id}/items"),
        Some(json!({"product_id": 8, "name": "Gadget", "quantity": 1, "price": 2.5})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let gadget_id = gadget["id"].as_i64().expect("item id");
    assert_ne!(gadget_id, item_id);

    let (_, _, cart) = common::request(
        &router,
        Method::GET,
        &format!("/shopcarts/{cart_id}"),
        None,
    )
    .await;
    assert_eq!(cart["total_price"], json!(27.5));

    // Item listing with in-memory equality filters, ANDed.
    let (_, _, items) = common::request(
        &router,
        Method::GET,
        &format!("/shopcarts/{cart_id}/items"),
        None,
    )
    .await;
    assert_eq!(items.as_array().expect("array").len(), 2);

    let (_, _, items) = common::request(
        &router,
        Method::GET,
        &format!("/shopcarts/{cart_id}/items?product_id=7"),
        None,
    )
    .await;
    let items = items.as_array().expect("array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], json!("Widget"));

    let (_, _, items) = common::request(
        &router,
        Method::GET,
        &format!("/shopcarts/{cart_id}/items?name=Gadget"),
        None,
    )
    .await;
    assert_eq!(items.as_array().expect("array").len(), 1);

    let (_, _, items) = common::request(
        &router,
        Method::GET,
        &format!("/shopcarts/{cart_id}/items?product_id=7&name=Gadget"),
        None,
    )
    .await;
    assert_eq!(items, json!([]));

    // Reading an item through the wrong cart is a 404.
    let (_, _, other_cart) = common::request(
        &router,
        Method::POST,
        "/shopcarts",
        Some(json!({"total_price": 0})),
    )
    .await;
    let other_cart_id = other_cart["id"].as_i64().expect("cart id");
    let (status, _, _) = common::request(
        &router,
        Method::GET,
        &format!("/shopcarts/{other_cart_id}/items/{item_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, fetched) = common::request(
        &router,
        Method::GET,
        &format!("/shopcarts/{cart_id}/items/{item_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["quantity"], json!(5));

    // Full item replace; the total follows immediately.
    let (status, _, updated) = common::request(
        &router,
        Method::PUT,
        &format!("/shopcarts/{cart_id}/items/{item_id}"),
        Some(json!({"product_id": 7, "name": "Widget", "quantity": 1, "price": 5.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["quantity"], json!(1));

    let (_, _, cart) = common::request(
        &router,
        Method::GET,
        &format!("/shopcarts/{cart_id}"),
        None,
    )
    .await;
    assert_eq!(cart["total_price"], json!(7.5));

    // Updating a missing item is a 404.
    let (status, _, _) = common::request(
        &router,
        Method::PUT,
        &format!("/shopcarts/{cart_id}/items/999999"),
        Some(json!({"product_id": 7, "name": "Widget", "quantity": 1, "price": 5.0})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Wrong Content-Type on an item write is a 415.
    let (status, body) = common::request_with_content_type(
        &router,
        Method::PUT,
        &format!("/shopcarts/{cart_id}/items/{item_id}"),
        r#"{"product_id": 7, "name": "Widget", "quantity": 1, "price": 5.0}"#,
        Some("text/plain"),
    )
    .await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"], json!("Unsupported media type"));

    // Deleting an item drops its contribution from the total.
    let (status, _, _) = common::request(
        &router,
        Method::DELETE,
        &format!("/shopcarts/{cart_id}/items/{item_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, _, cart) = common::request(
        &router,
        Method::GET,
        &format!("/shopcarts/{cart_id}"),
        None,
    )
    .await;
    assert_eq!(cart["items"].as_array().expect("array").len(), 1);
    assert_eq!(cart["total_price"], json!(2.5));

    // Deleting it again is still 204.
    let (status, _, _) = common::request(
        &router,
        Method::DELETE,
        &format!("/shopcarts/{cart_id}/items/{item_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Clearing the cart zeroes the total.
    let (status, _, _) = common::request(
        &router,
        Method::DELETE,
        &format!("/shopcarts/{cart_id}/items"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, _, cart) = common::request(
        &router,
        Method::GET,
        &format!("/shopcarts/{cart_id}"),
        None,
    )
    .await;
    assert_eq!(cart["items"], json!([]));
    assert_eq!(cart["total_price"], json!(0.0));

    // Store-level finders. Two lines share a name so the distinct-cart
    // query has duplicates to collapse.
    let (_, _, widget) = common::request(
        &router,
        Method::POST,
        &format!("/shopcarts/{cart_id}/items"),
        Some(json!({"product_id": 7, "name": "Widget", "quantity": 2, "price": 5.0})),
    )
    .await;
    let widget_id = widget["id"].as_i64().expect("item id");
    let (_, _, _) = common::request(
        &router,
        Method::POST,
        &format!("/shopcarts/{cart_id}/items"),
        Some(json!({"product_id": 9, "name": "Widget", "quantity": 1, "price": 1.0})),
    )
    .await;

    let shopcart_id = cart_id as i32;

    let line = store::items::find_by_product_and_shopcart(&orm, 7, shopcart_id)
        .await?
        .expect("line for product 7");
    assert_eq!(line.id, Some(widget_id as i32));

    // These three intentionally keep the service's historical
    // first-match behavior: one row back even when several match.
    let first = store::items::find_by_shopcart_id(&orm, shopcart_id)
        .await?
        .expect("first item in cart");
    assert_eq!(first.id, Some(widget_id as i32));

    let by_name = store::items::find_by_name(&orm, "Widget")
        .await?
        .expect("first Widget");
    assert_eq!(by_name.product_id, 7);

    let by_product = store::items::find_by_product_id(&orm, 9)
        .await?
        .expect("product 9 line");
    assert_eq!(by_product.product_id, 9);

    // The cart-level query deduplicates: two matching lines, one cart.
    let carts = store::shopcarts::find_by_item_name(&orm, "Widget").await?;
    assert_eq!(carts.len(), 1);
    assert_eq!(carts[0].id, Some(shopcart_id));

    let carts = store::shopcarts::find_by_item_product_id(&orm, 7).await?;
    assert_eq!(carts.len(), 1);
    assert_eq!(carts[0].id, Some(shopcart_id));

    Ok(())
}
