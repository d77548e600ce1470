use flatbind_emit::EmitOptions;
use flatbind_lowering::LoweringOptions;

/// Settings of a full export run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportConfig {
    pub lowering: LoweringOptions,
    pub emit: EmitOptions,
}

impl ExportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lowering(mut self, lowering: LoweringOptions) -> Self {
        self.lowering = lowering;
        self
    }

    pub fn with_emit(mut self, emit: EmitOptions) -> Self {
        self.emit = emit;
        self
    }
}
