use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct SubscribeBody {
    #[serde(default)]
    pub email: String,
}

#[derive(Serialize)]
pub struct SubscribeResponse {
    pub message: String,
}
