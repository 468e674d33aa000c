//! DELETE and TRUNCATE statements

use super::Builder;
use crate::compiler::CompiledQuery;
use crate::Result;

impl Builder {
    /// Compile a DELETE of the rows matched by this builder's conditions
    ///
    /// # Examples
    /// ```
    /// use quarry_core::{op, table};
    ///
    /// let query = table("sessions")
    ///     .where_(("last_seen", op::LT, "2024-01-01"))
    ///     .delete()?;
    /// assert_eq!(query.sql, "delete from `sessions` where `last_seen` < ?");
    /// # Ok::<(), quarry_core::Error>(())
    /// ```
    pub fn delete(&self) -> Result<CompiledQuery> {
        self.check()?;
        self.compiler.compile_delete(self)
    }

    /// Compile a statement emptying the whole table
    pub fn truncate(&self) -> Result<CompiledQuery> {
        self.check()?;
        self.compiler.compile_truncate(self)
    }
}
