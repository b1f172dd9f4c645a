//! Core traits for record storage
//!
//! This module defines the store abstraction the transfer engine runs
//! against, so alternative backends (an embedded database, a remote store)
//! can be swapped in without touching the engine.

use crate::types::{BenefitDraft, BenefitError, BenefitRecord, RecordId};

/// Trait for the benefit record store
///
/// The store is the single source of truth and the only shared mutable
/// resource in the system. All writes are version-checked: a record carries
/// the version it was read at, and a write presenting a stale version fails
/// with [`BenefitError::Conflict`] instead of silently overwriting.
pub trait RecordStore: Send + Sync {
    /// Fetch a record by id
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record exists with the given id.
    fn get(&self, id: RecordId) -> Result<BenefitRecord, BenefitError>;

    /// Create a new record from a draft
    ///
    /// Assigns the next id in the store's sequence and version 0. The
    /// `active` flag defaults to true when the draft leaves it unset.
    fn create(&self, draft: BenefitDraft) -> Result<BenefitRecord, BenefitError>;

    /// Commit a mutation of a single record
    ///
    /// The record's `version` field must match the currently stored
    /// version; on match the stored version is bumped by exactly 1 and the
    /// updated record is returned.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the id no longer resolves
    /// * `Conflict` if another writer committed since the record was read
    fn save(&self, record: BenefitRecord) -> Result<BenefitRecord, BenefitError>;

    /// Commit mutations of two records as a single atomic unit
    ///
    /// Both version checks pass and both writes land, or neither does.
    /// This is the transactional primitive transfers commit through; the
    /// engine never issues two independent `save` calls for a debit/credit
    /// pair.
    ///
    /// # Errors
    ///
    /// * `NotFound` if either id no longer resolves
    /// * `Conflict` naming the first record whose version check failed
    fn save_pair(
        &self,
        first: BenefitRecord,
        second: BenefitRecord,
    ) -> Result<(BenefitRecord, BenefitRecord), BenefitError>;

    /// All records, sorted by id
    fn list(&self) -> Vec<BenefitRecord>;

    /// Active records only, sorted by id
    fn list_active(&self) -> Vec<BenefitRecord>;

    /// Records whose name contains the fragment, case-insensitively, sorted by id
    fn find_by_name(&self, fragment: &str) -> Vec<BenefitRecord>;
}
