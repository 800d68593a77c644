//! Diesel schema for task persistence.

diesel::table! {
    /// User task records.
    user_tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 100]
        title -> Varchar,
        /// Optional task description.
        #[max_length = 500]
        description -> Nullable<Varchar>,
        /// Optional due date.
        due_date -> Nullable<Timestamptz>,
        /// Task progress status.
        #[max_length = 32]
        status -> Varchar,
    }
}
