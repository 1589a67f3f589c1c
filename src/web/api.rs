//! JSON handlers for the web dashboard.
//!
//! View endpoints answer with the current view model, or `null` until the
//! first successful fetch. Action endpoints forward to the [`Dashboard`].

use anyhow::Result;
use serde_json::json;

use crate::views::{DashError, Dashboard};

use super::Reply;

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// GET /view/status
pub fn get_status(dashboard: &Dashboard) -> Result<Reply> {
    Reply::json(200, &dashboard.status())
}

/// GET /view/stats
pub fn get_stats(dashboard: &Dashboard) -> Result<Reply> {
    Reply::json(200, &dashboard.stats())
}

/// GET /view/files
pub fn get_files(dashboard: &Dashboard) -> Result<Reply> {
    Reply::json(200, &dashboard.files())
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// POST /action/run
pub fn post_run(dashboard: &Dashboard) -> Result<Reply> {
    match dashboard.run_now() {
        Ok(()) => Reply::json(200, &json!({ "success": true })),
        Err(e @ DashError::AlreadyRunning) => Ok(Reply::error(409, &e.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// POST /action/delete with a JSON array of grid ids.
pub fn post_delete(dashboard: &Dashboard, body: &str) -> Result<Reply> {
    let ids: Vec<usize> = match serde_json::from_str(body) {
        Ok(ids) => ids,
        Err(e) => {
            return Ok(Reply::error(
                400,
                &format!("expected a JSON array of row ids: {e}"),
            ));
        }
    };

    match dashboard.delete_selected(&ids) {
        Ok(deleted) => Reply::json(200, &json!({ "success": true, "deleted": deleted })),
        Err(e @ DashError::InvalidSelection { .. }) => Ok(Reply::error(400, &e.to_string())),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{BaseUrl, CheckrrClient};

    fn offline() -> Dashboard {
        let base = BaseUrl::parse("http://127.0.0.1:9/").unwrap();
        Dashboard::new(CheckrrClient::new(base))
    }

    fn body(reply: &Reply) -> serde_json::Value {
        serde_json::from_slice(&reply.body).unwrap()
    }

    #[test]
    fn delete_rejects_non_array_body() {
        let reply = post_delete(&offline(), r#"{"ids": [1]}"#).unwrap();
        assert_eq!(reply.status, 400);
        assert!(body(&reply)["error"].as_str().unwrap().contains("JSON array"));
    }

    #[test]
    fn delete_rejects_negative_ids() {
        let reply = post_delete(&offline(), "[-1]").unwrap();
        assert_eq!(reply.status, 400);
    }

    #[test]
    fn empty_selection_sends_nothing() {
        // The backend is unreachable, so any request would surface as an error.
        let reply = post_delete(&offline(), "[]").unwrap();
        assert_eq!(reply.status, 200);
        assert_eq!(body(&reply)["deleted"], 0);
    }

    #[test]
    fn unreachable_backend_is_a_handler_error() {
        assert!(post_run(&offline()).is_err());
    }
}
