use crate::foundation::error::{QrStyleError, QrStyleResult};
use crate::model::{EccLevel, OverlayLayer, StyleConfig, SymbolRequest};

/// Derive encoder parameters from user input.
///
/// `ecc = None` means auto: decoration consumes redundant capacity, so any
/// overlay forces `H`; a bare symbol gets `M` (the classic generator
/// default). An explicit level always wins.
pub fn plan(
    content: &str,
    style: &StyleConfig,
    ecc: Option<EccLevel>,
    fixed_version: Option<i16>,
    overlays: &[OverlayLayer],
) -> QrStyleResult<SymbolRequest> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(QrStyleError::EmptyContent);
    }

    if let Some(v) = fixed_version {
        if !(1..=40).contains(&v) {
            return Err(QrStyleError::validation(format!(
                "fixed_version must be in [1, 40], got {v}"
            )));
        }
    }

    let ecc = ecc.unwrap_or(if overlays.is_empty() {
        EccLevel::M
    } else {
        EccLevel::H
    });

    Ok(SymbolRequest {
        content: trimmed.to_string(),
        ecc,
        fixed_version,
        border_modules: style.border_modules,
    })
}
