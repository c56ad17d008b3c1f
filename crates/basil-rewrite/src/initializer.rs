//! Per-type accumulator for the synthesized `Init<Type>` procedure.

/// Collects the statements a converted record type must run before use.
///
/// The procedure header is written on the first [`add`](Self::add), so a
/// type that never needs initialization produces no text at all.
/// [`finish`](Self::finish) consumes the builder.
#[derive(Debug, Clone)]
pub struct StructureInitializer {
    type_name: String,
    body: String,
}

impl StructureInitializer {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            body: String::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Append one statement to the procedure body.
    pub fn add(&mut self, statement: &str) {
        if self.body.is_empty() {
            self.body.push_str(&format!("Sub {}()\n", procedure_name(&self.type_name)));
        }
        self.body.push_str("    ");
        self.body.push_str(statement);
        self.body.push('\n');
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// The complete procedure text, or an empty string if nothing was added.
    pub fn finish(self) -> String {
        if self.body.is_empty() {
            return String::new();
        }
        let mut text = self.body;
        text.push_str("End Sub\n");
        text
    }
}

/// Name of the initializer procedure of `type_name`.
pub fn procedure_name(type_name: &str) -> String {
    format!("Init{type_name}")
}
