use std::io::Cursor;

use image::{GenericImageView, ImageFormat};

use crate::error::academy::{AcademyError, Result};

pub const MIN_AVATAR_SIZE: u32 = 128;
pub const AVATAR_FILE_NAME: &str = "avatar.png";
/// 默认裁剪框占短边的比例（百分比）
const DEFAULT_CROP_PERCENT: u32 = 90;

/// 正方形裁剪框，单位为原图像素
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl CropRect {
    /// 居中、边长为短边 90% 的裁剪框，不小于最小头像尺寸
    pub fn centered(width: u32, height: u32) -> Self {
        let shorter = width.min(height);
        let size = (shorter * DEFAULT_CROP_PERCENT / 100).max(MIN_AVATAR_SIZE.min(shorter));
        CropRect {
            x: (width - size) / 2,
            y: (height - size) / 2,
            size,
        }
    }

    /// 裁剪框超出图片时向内收缩
    fn clamp_to(self, width: u32, height: u32) -> Result<Self> {
        if width.min(height) < MIN_AVATAR_SIZE {
            return Err(AcademyError::Validation(format!(
                "avatar image must be at least {0}x{0} pixels",
                MIN_AVATAR_SIZE
            )));
        }
        let size = self.size.clamp(MIN_AVATAR_SIZE, width.min(height));
        Ok(CropRect {
            x: self.x.min(width - size),
            y: self.y.min(height - size),
            size,
        })
    }
}

/// 解码上传的图片，按裁剪框（缺省居中）裁成正方形并编码为 PNG
pub fn crop_avatar(bytes: &[u8], crop: Option<CropRect>) -> Result<Vec<u8>> {
    let image = image::load_from_memory(bytes)?;
    let (width, height) = image.dimensions();
    let rect = crop
        .unwrap_or_else(|| CropRect::centered(width, height))
        .clamp_to(width, height)?;

    log::debug!(
        "cropping {}x{} avatar to {}px square at ({}, {})",
        width,
        height,
        rect.size,
        rect.x,
        rect.y
    );

    let cropped = image.crop_imm(rect.x, rect.y, rect.size, rect.size);
    let mut out = Cursor::new(Vec::new());
    cropped.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}
