use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Multiplier applied to a quoted amount to obtain the final quote.
pub const QUOTE_FACTOR: f64 = 1.23;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "empresa")]
    pub company: String,
    #[serde(rename = "cotacao_final")]
    pub final_quote: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted: bool,
}

impl User {
    pub fn new(company: String, final_quote: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            company,
            final_quote,
            created_at: now,
            updated_at: now,
            deleted: false,
        }
    }

    pub fn mark_deleted(&mut self) {
        self.deleted = true;
        self.updated_at = Utc::now();
    }
}

/// Incoming quote request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(rename = "empresa")]
    pub company: String,
    #[serde(rename = "valor")]
    pub amount: i64,
}

impl NewUser {
    pub fn final_quote(&self) -> f64 {
        self.amount as f64 * QUOTE_FACTOR
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPage {
    pub data: Vec<User>,
    pub page: usize,
    pub limit: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl UserPage {
    pub fn new(data: Vec<User>, page: usize, limit: usize, total_items: usize) -> Self {
        Self {
            data,
            page,
            limit,
            total_items,
            total_pages: total_items.div_ceil(limit.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_wire_format() {
        let user = User::new("Acme".to_string(), 12.3);
        let value = serde_json::to_value(&user).unwrap();

        assert_eq!(value["_id"], json!(user.id));
        assert_eq!(value["empresa"], json!("Acme"));
        assert_eq!(value["cotacao_final"], json!(12.3));
        assert_eq!(value["deleted"], json!(false));
        assert!(value.get("created_at").is_some());
    }

    #[test]
    fn test_new_user_quote() {
        let req: NewUser = serde_json::from_value(json!({"empresa": "Acme", "valor": 100})).unwrap();
        assert_eq!(req.company, "Acme");
        assert!((req.final_quote() - 123.0).abs() < 1e-9);
    }

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(UserPage::new(vec![], 1, 10, 0).total_pages, 0);
        assert_eq!(UserPage::new(vec![], 1, 10, 10).total_pages, 1);
        assert_eq!(UserPage::new(vec![], 1, 10, 11).total_pages, 2);
    }

    #[test]
    fn test_mark_deleted_touches_timestamp() {
        let mut user = User::new("Acme".to_string(), 1.0);
        let before = user.updated_at;
        user.mark_deleted();
        assert!(user.deleted);
        assert!(user.updated_at >= before);
    }
}
