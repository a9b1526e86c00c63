//! Database seeder for Quill development and testing.
//!
//! Seeds a test author plus a published post and a draft for local
//! development.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use quill_core::auth::hash_password;
use quill_core::post::generate_slug;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;
use quill_db::entities::{posts, users};

/// Test author ID (consistent for all seeds)
const TEST_USER_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Published demo post ID
const PUBLISHED_POST_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Draft demo post ID
const DRAFT_POST_ID: &str = "00000000-0000-0000-0000-000000000003";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = quill_db::connect(&database_url, 5)
        .await
        .expect("Failed to connect to database");

    println!("Seeding test author...");
    seed_test_author(&db).await;

    println!("Seeding demo posts...");
    seed_demo_posts(&db).await;

    println!("Seeding complete!");
}

fn test_user_id() -> Uuid {
    Uuid::parse_str(TEST_USER_ID).unwrap()
}

/// Seeds a test author for development.
async fn seed_test_author(db: &DatabaseConnection) {
    // Check if the author already exists
    if users::Entity::find_by_id(test_user_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Test author already exists, skipping...");
        return;
    }

    let password_hash = hash_password("quill-dev-password").expect("should hash password");

    let user = users::ActiveModel {
        id: Set(test_user_id()),
        email: Set("author@quill.dev".to_string()),
        password_hash: Set(password_hash),
        full_name: Set("Test Author".to_string()),
        avatar_url: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert test author: {e}");
    } else {
        println!("  Created test author: author@quill.dev / quill-dev-password");
    }
}

/// Seeds one published post and one draft.
async fn seed_demo_posts(db: &DatabaseConnection) {
    let demos = [
        (
            PUBLISHED_POST_ID,
            "Welcome to Quill",
            "This is a seeded story so the public feed is not empty.\n\n\
             Log in as the test author to edit it.",
            true,
        ),
        (
            DRAFT_POST_ID,
            "An Unfinished Thought",
            "Drafts are visible only to their author.",
            false,
        ),
    ];

    for (id, title, content, published) in demos {
        let post_id = Uuid::parse_str(id).unwrap();

        if posts::Entity::find_by_id(post_id)
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Post '{title}' already exists, skipping...");
            continue;
        }

        let post = posts::ActiveModel {
            id: Set(post_id),
            title: Set(title.to_string()),
            slug: Set(generate_slug(title)),
            content: Set(content.to_string()),
            excerpt: Set(None),
            featured_image: Set(None),
            images: Set(None),
            author_id: Set(test_user_id()),
            published: Set(published),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = post.insert(db).await {
            eprintln!("Failed to insert post '{title}': {e}");
        } else {
            println!("  Created post: {title}");
        }
    }
}
