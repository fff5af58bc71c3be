//! Message id generation (spec.md §4.2: "a client-generated identifier (v4
//! UUID recommended) unique per outgoing Call").

use uuid::Uuid;

pub fn new_message_id() -> String {
    Uuid::new_v4().to_string()
}
