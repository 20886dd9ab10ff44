use crate::foundation::error::{QrStyleError, QrStyleResult};
use crate::model::{EccLevel, SymbolRequest};

/// Square grid of symbol modules, immutable once produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleMatrix {
    size: u32,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    /// Side length in modules.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Module at `(x, y)`; coordinates outside the grid read as "off", which
    /// makes quiet-zone iteration trivial.
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= i64::from(self.size) || y >= i64::from(self.size) {
            return false;
        }
        self.modules[(y as usize) * (self.size as usize) + (x as usize)]
    }
}

/// Encode the planned request into a module matrix.
///
/// Delegates to the `qrcode` crate (version selection, codeword generation,
/// mask selection); failures such as content too long for a fixed version
/// surface as [`QrStyleError::Encoding`].
pub fn encode(req: &SymbolRequest) -> QrStyleResult<ModuleMatrix> {
    let ec = match req.ecc {
        EccLevel::L => qrcode::EcLevel::L,
        EccLevel::M => qrcode::EcLevel::M,
        EccLevel::Q => qrcode::EcLevel::Q,
        EccLevel::H => qrcode::EcLevel::H,
    };

    let code = match req.fixed_version {
        Some(v) => {
            qrcode::QrCode::with_version(req.content.as_bytes(), qrcode::Version::Normal(v), ec)
        }
        None => qrcode::QrCode::with_error_correction_level(req.content.as_bytes(), ec),
    }
    .map_err(|e| QrStyleError::encoding(format!("symbol encoding failed: {e}")))?;

    let size = code.width() as u32;
    let modules: Vec<bool> = code
        .to_colors()
        .into_iter()
        .map(|c| c == qrcode::Color::Dark)
        .collect();

    debug_assert_eq!(modules.len(), (size as usize) * (size as usize));
    Ok(ModuleMatrix { size, modules })
}
