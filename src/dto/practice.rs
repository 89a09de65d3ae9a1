use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

/// Query of the practice endpoint.
#[derive(Debug, Deserialize, IntoParams, Validate)]
pub struct PracticeQuery {
    pub pack_id: i64,
    /// Number of questions to draw; the configured default when omitted.
    #[validate(range(min = 1))]
    pub count: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_has_no_upper_bound() {
        let query = PracticeQuery {
            pack_id: 1,
            count: Some(500),
        };
        assert!(query.validate().is_ok());
        assert!(
            PracticeQuery {
                pack_id: 1,
                count: Some(0)
            }
            .validate()
            .is_err()
        );
    }
}
