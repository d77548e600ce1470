//! The C header.
//!
//! Every record gets a forward `typedef` first, so pointer members may refer
//! to records registered later. Value records are then defined in
//! registration order, which already puts by-value member types first.

use std::fmt::Write as _;

use flatbind_core::{ExportRecord, LoweredField};

use crate::{CSignature, EmitError, Emitter};

impl Emitter<'_> {
    pub(crate) fn header(&self, signatures: &[CSignature]) -> Result<String, EmitError> {
        let mut out = String::new();
        let alignas = self.options.alignas_macro();

        writeln!(out, "#pragma once")?;
        writeln!(out)?;
        writeln!(out, "#include <stddef.h>")?;
        writeln!(out, "#include <stdint.h>")?;
        writeln!(out, "#include <stdbool.h>")?;
        writeln!(out)?;
        writeln!(out, "#ifdef __cplusplus")?;
        writeln!(out, "#define {alignas}(n) alignas(n)")?;
        writeln!(out, "extern \"C\" {{")?;
        writeln!(out, "#else")?;
        writeln!(out, "#define {alignas}(n) _Alignas(n)")?;
        writeln!(out, "#endif")?;

        if !self.registry.is_empty() {
            writeln!(out)?;
            for (_, record) in self.registry.iter() {
                let name = record.exported_name();
                writeln!(out, "typedef struct {name} {name};")?;
            }
        }

        for (_, record) in self.registry.iter() {
            if let ExportRecord::Value {
                exported_name,
                fields,
            } = record
            {
                writeln!(out)?;
                write_struct(&mut out, exported_name, fields, &alignas)?;
            }
        }

        if !signatures.is_empty() {
            writeln!(out)?;
            for signature in signatures {
                writeln!(out, "{};", signature.prototype())?;
            }
        }

        writeln!(out)?;
        writeln!(out, "#ifdef __cplusplus")?;
        writeln!(out, "}}")?;
        writeln!(out, "#endif")?;
        Ok(out)
    }
}

fn write_struct(
    out: &mut String,
    name: &str,
    fields: &[LoweredField],
    alignas: &str,
) -> Result<(), EmitError> {
    writeln!(out, "struct {name} {{")?;
    if fields.is_empty() {
        // C forbids empty structs.
        writeln!(out, "    uint8_t _empty;")?;
    }
    for field in fields {
        match &field.type_name {
            None => writeln!(
                out,
                "    {alignas}({}) uint8_t {}[{}];",
                field.align, field.name, field.size
            )?,
            Some(ty) if field.is_pointer => writeln!(out, "    {ty} *{};", field.name)?,
            Some(ty) => writeln!(out, "    {ty} {};", field.name)?,
        }
    }
    writeln!(out, "}};")?;
    Ok(())
}
