//! # Scheduling Service
//!
//! Owns consultation dates and their time slots.
//!
//! ## Create
//!
//! A create request passes, in order: the administrative role check, body
//! validation, a duplicate-date pre-check, and finally the transactional
//! insert of the date plus every slot. The pre-check only exists to answer
//! the common case cheaply; the store's unique constraint on the date is
//! what actually keeps two racing writers from both succeeding, and the
//! loser receives the same conflict error.
//!
//! ## List
//!
//! Listings are served from a short-lived cache keyed by the list path and
//! the day they were computed for. A successful create invalidates every
//! such entry, and a listing read from the store before that create is
//! never cached after it, so the new date shows up on the next read.

use std::{sync::Arc, time::Duration};

use chrono::{NaiveDate, Utc};
use clinicdesk_core::{
    auth::AuthContext,
    errors::{ClinicError, ClinicResult},
    models::consultation::{
        ConsultationDate, ConsultationDatesResponse, CreateConsultationDateRequest,
        DUPLICATE_DATE_MESSAGE,
    },
};
use clinicdesk_db::store::ConsultationStore;
use tracing::{info, warn};

use crate::services::listing_cache::ListingCache;

/// Path of the public listing, also the cache key prefix.
pub const CONSULTATION_DATES_PATH: &str = "/api/consultation/dates";

pub struct SchedulingService {
    store: Arc<dyn ConsultationStore>,
    cache: ListingCache<ConsultationDatesResponse>,
    throttle: Duration,
}

impl SchedulingService {
    /// `throttle` is slept before every store access; `cache_ttl` bounds how
    /// long a listing may be served without asking the store.
    pub fn new(store: Arc<dyn ConsultationStore>, throttle: Duration, cache_ttl: Duration) -> Self {
        Self {
            store,
            cache: ListingCache::new(cache_ttl),
            throttle,
        }
    }

    async fn pace(&self) {
        if !self.throttle.is_zero() {
            tokio::time::sleep(self.throttle).await;
        }
    }

    /// Active consultation dates from today onwards with their available slots.
    pub async fn list(&self) -> ClinicResult<Arc<ConsultationDatesResponse>> {
        self.list_from(Utc::now().date_naive()).await
    }

    // Entries are keyed by day so a listing never outlives the date it was
    // computed for.
    async fn list_from(&self, today: NaiveDate) -> ClinicResult<Arc<ConsultationDatesResponse>> {
        let key = format!("{}@{}", CONSULTATION_DATES_PATH, today);
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let generation = self.cache.generation().await;

        self.pace().await;

        let consultation_dates = self.store.list_upcoming(today).await?;
        let listing = Arc::new(ConsultationDatesResponse { consultation_dates });

        self.cache.put(&key, Arc::clone(&listing), generation).await;

        Ok(listing)
    }

    /// Creates a consultation date together with all of its slots.
    pub async fn create(
        &self,
        auth: &AuthContext,
        request: &CreateConsultationDateRequest,
    ) -> ClinicResult<ConsultationDate> {
        auth.require_admin()?;

        let new_date = request.validate()?;

        self.pace().await;

        if self.store.find_by_date(new_date.date).await?.is_some() {
            warn!("Rejected duplicate consultation date {}", new_date.date);
            return Err(ClinicError::Conflict(DUPLICATE_DATE_MESSAGE.to_string()));
        }

        let created = self
            .store
            .create_with_slots(new_date.date, new_date.time_slots)
            .await?;

        self.cache.invalidate(CONSULTATION_DATES_PATH).await;

        info!(
            "Created consultation date {} ({}) with {} time slots",
            created.date,
            created.id,
            created.time_slots.len()
        );

        Ok(created)
    }
}
