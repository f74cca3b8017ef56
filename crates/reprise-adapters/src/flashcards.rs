//! Flashcard-deck integration.
//!
//! Maps the four-button self-assessment onto engine grades and keeps deck
//! display counters. SRS state itself always comes from the returned record;
//! the adapter never re-derives it.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use reprise_core::engine::ReviewEngine;
use reprise_core::error::RepriseResult;
use reprise_core::types::{ContentType, Page, ProgrammedReview, ReviewStatus};

use crate::types::{ReviewOutcome, SelfRating};

/// Display counters for one deck of cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckProgress {
    /// Cards in the deck.
    pub total_cards: u64,
    /// Cards never reviewed.
    pub unseen: u64,
    pub learning: u64,
    pub reviewing: u64,
    /// Cards marked mastered and taken out of scheduling.
    pub mastered: u64,
    pub due_now: u64,
    pub leeches: u64,
}

/// Adapter between flashcard decks and the review engine.
pub struct FlashcardAdapter {
    engine: Arc<ReviewEngine>,
}

impl FlashcardAdapter {
    /// Create an adapter over a shared engine.
    pub fn new(engine: Arc<ReviewEngine>) -> Self {
        Self { engine }
    }

    /// Record a self-assessment for one card.
    pub async fn review_card(
        &self,
        user_id: &str,
        card_id: &str,
        rating: SelfRating,
    ) -> RepriseResult<ReviewOutcome> {
        let review = self
            .engine
            .record_review(user_id, card_id, ContentType::Flashcard, rating.quality())
            .await?;
        Ok(ReviewOutcome::new(
            review,
            self.engine.config().scheduler.leech_lapse_threshold,
        ))
    }

    /// The interval each rating button would schedule, for button labels.
    pub async fn button_intervals(
        &self,
        user_id: &str,
        card_id: &str,
    ) -> RepriseResult<[(SelfRating, u32); 4]> {
        let by_grade = self
            .engine
            .preview_intervals(user_id, card_id, ContentType::Flashcard)
            .await?;
        Ok([
            (SelfRating::Again, by_grade[1]),
            (SelfRating::Hard, by_grade[3]),
            (SelfRating::Good, by_grade[4]),
            (SelfRating::Easy, by_grade[5]),
        ])
    }

    /// Take a mastered card out of scheduling.
    pub async fn mark_mastered(&self, user_id: &str, card_id: &str) -> RepriseResult<()> {
        self.engine
            .suspend(user_id, card_id, ContentType::Flashcard)
            .await
    }

    /// Return a mastered card to its frozen scheduling state.
    pub async fn restore_card(&self, user_id: &str, card_id: &str) -> RepriseResult<()> {
        self.engine
            .reactivate(user_id, card_id, ContentType::Flashcard)
            .await
    }

    /// Drop the review record for a card deleted from its deck.
    pub async fn remove_card(&self, user_id: &str, card_id: &str) -> RepriseResult<()> {
        self.engine
            .delete_review(user_id, card_id, ContentType::Flashcard)
            .await
    }

    /// Cards due for review, oldest first.
    pub async fn due_cards(
        &self,
        user_id: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> RepriseResult<Page<ProgrammedReview>> {
        self.engine
            .due_reviews(user_id, Some(ContentType::Flashcard), limit, cursor)
            .await
    }

    /// Progress counters for the deck holding the given cards.
    ///
    /// Deck membership lives with the caller; records are fetched in
    /// parallel since every card is an independent key.
    pub async fn deck_progress(
        &self,
        user_id: &str,
        card_ids: &[String],
    ) -> RepriseResult<DeckProgress> {
        let lookups: Vec<_> = card_ids
            .iter()
            .map(|card_id| {
                let engine = self.engine.clone();
                let user_id = user_id.to_string();
                let card_id = card_id.clone();
                async move {
                    engine
                        .get_review(&user_id, &card_id, ContentType::Flashcard)
                        .await
                }
            })
            .collect();

        let results = futures::future::join_all(lookups).await;

        let now = Utc::now();
        let leech_threshold = self.engine.config().scheduler.leech_lapse_threshold;
        let mut progress = DeckProgress {
            total_cards: card_ids.len() as u64,
            ..DeckProgress::default()
        };

        for result in results {
            let Some(review) = result? else {
                progress.unseen += 1;
                continue;
            };
            match review.status {
                ReviewStatus::Learning => progress.learning += 1,
                ReviewStatus::Reviewing => progress.reviewing += 1,
                ReviewStatus::Suspended => progress.mastered += 1,
            }
            if review.is_due(now) {
                progress.due_now += 1;
            }
            if review.is_leech(leech_threshold) {
                progress.leeches += 1;
            }
        }

        Ok(progress)
    }
}
