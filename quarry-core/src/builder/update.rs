//! UPDATE statements

use super::insert::IntoRow;
use super::Builder;
use crate::compiler::CompiledQuery;
use crate::Result;

impl Builder {
    /// Compile an UPDATE of the rows matched by this builder's conditions
    ///
    /// # Examples
    /// ```
    /// use quarry_core::{table, Value};
    ///
    /// let query = table("users")
    ///     .where_(("id", 1))
    ///     .update([("name", "Jane")])?;
    /// assert_eq!(query.sql, "update `users` set `name` = ? where `id` = ?");
    /// assert_eq!(query.bindings, vec![Value::from("Jane"), Value::from(1)]);
    /// # Ok::<(), quarry_core::Error>(())
    /// ```
    pub fn update<R>(&self, values: R) -> Result<CompiledQuery>
    where
        R: IntoRow,
    {
        self.check()?;
        self.compiler.compile_update(self, &values.into_row())
    }
}
