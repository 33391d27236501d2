//! Example client for the recognition server.
//!
//! Requires a running server; walks the API end to end and prints each
//! response. Pass the base URL as the first argument, defaults to the local
//! development address.

use std::env;

use reqwest::StatusCode;

use recognition_common::{
    AddImagesRequest, DeleteResponse, ErrorResponse, ImageRecord, ImageResponse, ImagesResponse,
    NewImage,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:8080".to_string());
    let base_url = base_url.trim_end_matches('/').to_string();

    let client = reqwest::Client::new();

    // Add two images without running inference on them.
    let request = AddImagesRequest {
        new_imgs: vec![
            NewImage::with_url("http://imgdirect.s3-website-us-west-2.amazonaws.com/neither.jpg"),
            NewImage::with_url("http://imgdirect.s3-website-us-west-2.amazonaws.com/neither2.jpg"),
        ],
    };
    let response = client
        .post(format!("{base_url}/images"))
        .json(&request)
        .send()
        .await?;
    println!("POST /images -> {}", response.status());
    let created: Vec<ImageRecord> = response.json().await?;
    println!("{}", serde_json::to_string_pretty(&created)?);

    // Run inference on the first record we just created.
    if let Some(first) = created.first() {
        let response = client
            .put(format!("{base_url}/infer/{}", first.id))
            .json(&serde_json::json!({ "id": first.id }))
            .send()
            .await?;
        println!("PUT /infer/{} -> {}", first.id, response.status());
        if response.status() == StatusCode::OK {
            let inferred: ImageResponse = response.json().await?;
            println!("{}", serde_json::to_string_pretty(&inferred.img)?);
        }
    }

    // Classify everything still pending.
    let response = client
        .put(format!("{base_url}/inferundone"))
        .send()
        .await?;
    println!("PUT /inferundone -> {}", response.status());
    if response.status() == StatusCode::OK {
        let updated: ImagesResponse = response.json().await?;
        println!("{}", serde_json::to_string_pretty(&updated.images)?);
    } else {
        let error: ErrorResponse = response.json().await?;
        println!("{}", error.error);
    }

    // Add and classify in a single call.
    let request = AddImagesRequest {
        new_imgs: vec![NewImage::with_url(
            "https://farm4.static.flickr.com/3118/3275588806_33384d2638.jpg",
        )],
    };
    let response = client
        .post(format!("{base_url}/imagesinfer"))
        .json(&request)
        .send()
        .await?;
    println!("POST /imagesinfer -> {}", response.status());
    let classified: Vec<ImageRecord> = response.json().await?;
    println!("{}", serde_json::to_string_pretty(&classified)?);

    // Clean up the first record.
    if let Some(first) = created.first() {
        let response = client
            .delete(format!("{base_url}/images/{}", first.id))
            .send()
            .await?;
        println!("DELETE /images/{} -> {}", first.id, response.status());
        if response.status() == StatusCode::OK {
            let deleted: DeleteResponse = response.json().await?;
            println!("result: {}", deleted.result);
        }
    }

    // Final state of the collection.
    let response = client.get(format!("{base_url}/images")).send().await?;
    println!("GET /images -> {}", response.status());
    let listing: ImagesResponse = response.json().await?;
    println!("{}", serde_json::to_string_pretty(&listing.images)?);

    Ok(())
}
