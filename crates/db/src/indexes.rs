use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Meetings
    create_indexes(
        db,
        "meetings",
        vec![
            index(bson::doc! { "host_id": 1, "created_at": -1 }),
            index(bson::doc! { "status": 1 }),
            index(bson::doc! { "meeting_type": 1, "created_at": -1 }),
        ],
    )
    .await?;

    // Meeting Participants
    create_indexes(
        db,
        "meeting_participants",
        vec![
            index_unique(bson::doc! { "meeting_id": 1, "user_id": 1 }),
            index(bson::doc! { "user_id": 1, "created_at": -1 }),
            index(bson::doc! { "user_id": 1, "role": 1 }),
        ],
    )
    .await?;

    // Monitoring Sessions
    create_indexes(
        db,
        "monitoring_sessions",
        vec![
            index_unique(bson::doc! { "meeting_id": 1, "user_id": 1 }),
            index(bson::doc! { "user_id": 1 }),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
