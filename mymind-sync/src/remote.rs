//! The remote routine collection as seen by the reconciler.

use mymind_client::{ApiClient, ApiError};
use mymind_core::{RoutineId, RoutineItem, UserId};

/// Operations on a child's routine collection.
///
/// Each call is a single blocking request; implementations must not retry.
pub trait RoutineRemote {
    /// Store a new item; the returned item carries the assigned id.
    fn create(&mut self, item: &RoutineItem) -> Result<RoutineItem, ApiError>;
    fn update(&mut self, id: RoutineId, item: &RoutineItem) -> Result<(), ApiError>;
    fn delete(&mut self, id: RoutineId) -> Result<(), ApiError>;
    /// Authoritative list for `owner`, in server order.
    fn list(&mut self, owner: &UserId) -> Result<Vec<RoutineItem>, ApiError>;
}

impl RoutineRemote for ApiClient {
    fn create(&mut self, item: &RoutineItem) -> Result<RoutineItem, ApiError> {
        self.create_routine(item)
    }

    fn update(&mut self, id: RoutineId, item: &RoutineItem) -> Result<(), ApiError> {
        self.update_routine(id, item)
    }

    fn delete(&mut self, id: RoutineId) -> Result<(), ApiError> {
        self.delete_routine(id)
    }

    fn list(&mut self, owner: &UserId) -> Result<Vec<RoutineItem>, ApiError> {
        self.list_routines(owner)
    }
}
