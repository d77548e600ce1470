use std::fmt::Write as _;

use crate::{CSignature, EmitError, Emitter};

impl Emitter<'_> {
    /// The function table: one pointer member per wrapper, plus a static
    /// instance compiled only when the consumer defines the guard macro.
    pub(crate) fn table(&self, signatures: &[CSignature]) -> Result<String, EmitError> {
        let mut out = String::new();
        let options = self.options;
        let name = &options.table_name;

        writeln!(out, "#pragma once")?;
        writeln!(out)?;
        writeln!(out, "#include \"{}\"", options.header_name)?;
        writeln!(out)?;
        writeln!(out, "#ifdef __cplusplus")?;
        writeln!(out, "extern \"C\" {{")?;
        writeln!(out, "#endif")?;
        writeln!(out)?;

        writeln!(out, "typedef struct {name} {{")?;
        if signatures.is_empty() {
            writeln!(out, "    uint8_t _empty;")?;
        }
        for signature in signatures {
            writeln!(out, "    {};", signature.pointer_member())?;
        }
        writeln!(out, "}} {name};")?;

        if options.emit_table_initializer {
            writeln!(out)?;
            writeln!(out, "#ifdef {}", options.table_guard)?;
            writeln!(out, "static const {name} {} = {{", options.table_instance)?;
            if signatures.is_empty() {
                writeln!(out, "    0,")?;
            }
            for signature in signatures {
                writeln!(out, "    {},", signature.name)?;
            }
            writeln!(out, "}};")?;
            writeln!(out, "#endif")?;
        }

        writeln!(out)?;
        writeln!(out, "#ifdef __cplusplus")?;
        writeln!(out, "}}")?;
        writeln!(out, "#endif")?;
        Ok(out)
    }
}
