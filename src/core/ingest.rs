use crate::core::extract::developer_id;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::insert_event;
use crate::errors::AppResult;
use chrono::{Local, NaiveDateTime};
use serde_json::Value;

pub struct IngestLogic;

impl IngestLogic {
    /// Store one webhook body as received.
    ///
    /// The body must be JSON and carry `user.id`; nothing is written
    /// otherwise. `time` defaults to the local wall clock, like the receiver.
    pub fn ingest(pool: &mut DbPool, body: &str, time: Option<NaiveDateTime>) -> AppResult<i64> {
        let payload: Value = serde_json::from_str(body)?;
        let dev_id = developer_id(&payload)?;
        let time = time.unwrap_or_else(|| Local::now().naive_local());

        // store the compact form, the body may come pretty-printed
        let id = insert_event(&pool.conn, &time, dev_id, &payload.to_string())?;

        let kind = payload
            .get("object_kind")
            .and_then(Value::as_str)
            .unwrap_or("event");
        ttlog_quiet(
            &pool.conn,
            "ingest",
            &format!("event {id}"),
            &format!("Stored {kind} from user {dev_id}"),
        );

        Ok(id)
    }
}
