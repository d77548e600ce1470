/// Names and switches used in the emitted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// File name the source and table sections include the header by.
    pub header_name: String,
    /// Prefix of every macro the header defines.
    pub macro_prefix: String,
    /// Type name of the function table.
    pub table_name: String,
    /// Name of the static table instance.
    pub table_instance: String,
    /// Macro the consumer defines to compile the static table initializer.
    pub table_guard: String,
    pub emit_table_initializer: bool,
    /// Headers declaring the host types, included by the wrapper source.
    /// Entries starting with `<` are emitted verbatim, others are quoted.
    pub source_includes: Vec<String>,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            header_name: "flatbind.h".to_string(),
            macro_prefix: "FLATBIND".to_string(),
            table_name: "FlatbindApi".to_string(),
            table_instance: "flatbind_api".to_string(),
            table_guard: "FLATBIND_API_IMPLEMENTATION".to_string(),
            emit_table_initializer: true,
            source_includes: Vec::new(),
        }
    }
}

impl EmitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = name.into();
        self
    }

    pub fn with_macro_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.macro_prefix = prefix.into();
        self
    }

    /// Set the table type name and the name of its static instance.
    pub fn with_table(mut self, name: impl Into<String>, instance: impl Into<String>) -> Self {
        self.table_name = name.into();
        self.table_instance = instance.into();
        self
    }

    pub fn with_table_guard(mut self, guard: impl Into<String>) -> Self {
        self.table_guard = guard.into();
        self
    }

    pub fn with_table_initializer(mut self, enable: bool) -> Self {
        self.emit_table_initializer = enable;
        self
    }

    pub fn with_source_include(mut self, include: impl Into<String>) -> Self {
        self.source_includes.push(include.into());
        self
    }

    /// The alignment macro, e.g. `FLATBIND_ALIGNAS`.
    pub fn alignas_macro(&self) -> String {
        format!("{}_ALIGNAS", self.macro_prefix)
    }
}
