//! Diesel schema for task persistence.

diesel::table! {
    /// Task records, one row per task.
    todos (id) {
        /// Sequence-assigned task identifier.
        id -> Int8,
        /// Trimmed task description.
        task -> Text,
        /// Completion flag.
        completed -> Bool,
        /// Optional due date.
        due_date -> Nullable<Date>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
