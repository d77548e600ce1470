//! The C++ wrapper definitions.
//!
//! Each wrapper converts its C arguments back into host types, calls the
//! host declaration and converts the result:
//!
//! | value                 | C to host                          | host to C                        |
//! |-----------------------|------------------------------------|----------------------------------|
//! | scalar                | as-is                              | as-is                            |
//! | value record          | `std::bit_cast<Host>(arg)`         | `std::bit_cast<Exported>(call)`  |
//! | pointer               | `reinterpret_cast<Host *>(arg)`    | `reinterpret_cast<T *>(call)`    |
//! | reference             | `*reinterpret_cast<Host *>(arg)`   | `reinterpret_cast<T *>(&call)`   |
//! | span, string_view     | `View{pointer, size}`              | n/a                              |
//! | container or view     | n/a                                | `callback(data, size, user_data)`|

use std::fmt::Write as _;

use flatbind_core::{ExportedFunction, LoweredParam, MemberKind, ValueKind, ViewKind};

use crate::signature::{const_element, const_prefix};
use crate::{CSignature, EmitError, Emitter};

impl Emitter<'_> {
    pub(crate) fn source(&self, signatures: &[CSignature]) -> Result<String, EmitError> {
        let mut out = String::new();

        writeln!(out, "#include \"{}\"", self.options.header_name)?;
        writeln!(out)?;
        writeln!(out, "#include <bit>")?;
        writeln!(out, "#include <cstddef>")?;
        if !self.options.source_includes.is_empty() {
            writeln!(out)?;
            for include in &self.options.source_includes {
                if include.starts_with('<') {
                    writeln!(out, "#include {include}")?;
                } else {
                    writeln!(out, "#include \"{include}\"")?;
                }
            }
        }

        writeln!(out)?;
        writeln!(out, "extern \"C\" {{")?;
        for (function, signature) in self.functions.iter().zip(signatures) {
            writeln!(out)?;
            write_wrapper(&mut out, function, signature)?;
        }
        writeln!(out)?;
        writeln!(out, "}}")?;
        Ok(out)
    }
}

fn write_wrapper(
    out: &mut String,
    function: &ExportedFunction,
    signature: &CSignature,
) -> Result<(), EmitError> {
    writeln!(out, "{} {{", signature.prototype())?;

    let args = function
        .params
        .iter()
        .map(argument)
        .collect::<Vec<_>>()
        .join(", ");
    let call = format!("{}({args})", call_target(function));

    let ret = &function.return_info;
    if let Some(element) = &ret.inner_element_type {
        writeln!(out, "    auto&& result = {call};")?;
        writeln!(
            out,
            "    callback(reinterpret_cast<{} *>(result.data()), result.size(), user_data);",
            const_element(element)
        )?;
    } else if ret.is_void() {
        writeln!(out, "    {call};")?;
    } else if ret.is_pointer {
        let target = format!("{}{} *", const_prefix(ret.is_const), ret.lowered_type);
        let address = if ret.is_reference { "&" } else { "" };
        match ret.kind {
            ValueKind::Scalar => writeln!(out, "    return {address}{call};")?,
            _ => writeln!(out, "    return reinterpret_cast<{target}>({address}{call});")?,
        }
    } else if ret.kind == ValueKind::Record {
        writeln!(out, "    return std::bit_cast<{}>({call});", ret.lowered_type)?;
    } else {
        writeln!(out, "    return {call};")?;
    }

    writeln!(out, "}}")?;
    Ok(())
}

/// What the wrapper calls: a member through `self`, or a qualified name.
fn call_target(function: &ExportedFunction) -> String {
    match &function.owner {
        Some(owner) if owner.takes_self() => format!(
            "reinterpret_cast<{}{} *>(self)->{}",
            const_prefix(owner.kind == MemberKind::ConstInstance),
            owner.record,
            owner.member_name
        ),
        _ => function.original_name.to_string(),
    }
}

/// The host-typed expression forwarded for one parameter.
fn argument(param: &LoweredParam) -> String {
    let name = &param.name;
    if let (Some(inner), ValueKind::View(view)) = (&param.inner_view, param.kind) {
        let pointer = if view == ViewKind::StringView || inner.is_const {
            "const_pointer"
        } else {
            "pointer"
        };
        return format!(
            "{source}{{reinterpret_cast<{source}::{pointer}>({name}), {name}_size}}",
            source = param.source_type
        );
    }

    let indirect = param.is_pointer || param.is_reference;
    let deref = if param.is_reference { "*" } else { "" };
    match param.kind {
        ValueKind::Scalar => format!("{deref}{name}"),
        ValueKind::Record if !indirect => format!("std::bit_cast<{}>({name})", param.source_type),
        _ => format!(
            "{deref}reinterpret_cast<{}{} *>({name})",
            const_prefix(param.is_const),
            param.source_type
        ),
    }
}
