use crate::error::{RecError, Result};
use crate::models::Rating;

pub fn validate_rating(rating: &Rating) -> Result<()> {
    if !rating.value.is_finite() {
        return Err(RecError::InvalidRating {
            user_id: rating.user_id,
            item_id: rating.item_id,
            value: rating.value,
        });
    }
    Ok(())
}
