//! Repository Traits

use crate::domain::entities::{NewPageview, Pageview};
use crate::error::AnalyticsResult;

#[trait_variant::make(PageviewRepository: Send)]
pub trait LocalPageviewRepository {
    /// Insert a pageview, returning the stored row
    async fn create(&self, pageview: &NewPageview) -> AnalyticsResult<Pageview>;
}
