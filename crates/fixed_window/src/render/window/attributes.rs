//! Framebuffer attribute list used for config selection

use std::fmt;

use bitflags::bitflags;

use crate::core::config::GpuApi;

bitflags! {
    /// Client APIs a framebuffer config can render with
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderableType: u32 {
        /// OpenGL ES 1.x
        const OPENGL_ES = 0x0001;
        /// OpenVG
        const OPENVG = 0x0002;
        /// OpenGL ES 2.x
        const OPENGL_ES2 = 0x0004;
        /// Desktop OpenGL
        const OPENGL = 0x0008;
        /// OpenGL ES 3.x
        const OPENGL_ES3 = 0x0040;
    }
}

/// Attribute keys understood by config selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ConfigAttribute {
    /// Alpha channel bits
    AlphaSize = 0x3021,
    /// Blue channel bits
    BlueSize = 0x3022,
    /// Green channel bits
    GreenSize = 0x3023,
    /// Red channel bits
    RedSize = 0x3024,
    /// Depth buffer bits
    DepthSize = 0x3025,
    /// Stencil buffer bits
    StencilSize = 0x3026,
    /// Terminator
    None = 0x3038,
    /// Required client API bits
    RenderableType = 0x3040,
}

/// Color/depth/stencil layout requested from, or reported by, the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferAttributes {
    /// Client APIs
    pub renderable_type: RenderableType,
    /// Red bits
    pub red_size: u8,
    /// Green bits
    pub green_size: u8,
    /// Blue bits
    pub blue_size: u8,
    /// Alpha bits
    pub alpha_size: u8,
    /// Depth bits
    pub depth_size: u8,
    /// Stencil bits
    pub stencil_size: u8,
}

impl FramebufferAttributes {
    /// The only attribute list the window ever requests: RGBA8888, D24, S8
    pub const fn fixed(api: GpuApi) -> Self {
        Self {
            renderable_type: api.renderable_type(),
            red_size: 8,
            green_size: 8,
            blue_size: 8,
            alpha_size: 8,
            depth_size: 24,
            stencil_size: 8,
        }
    }

    /// Key/value pairs in request order
    pub fn pairs(&self) -> [(ConfigAttribute, i32); 7] {
        [
            (ConfigAttribute::RenderableType, i32::try_from(self.renderable_type.bits()).unwrap_or(i32::MAX)),
            (ConfigAttribute::RedSize, i32::from(self.red_size)),
            (ConfigAttribute::GreenSize, i32::from(self.green_size)),
            (ConfigAttribute::BlueSize, i32::from(self.blue_size)),
            (ConfigAttribute::AlphaSize, i32::from(self.alpha_size)),
            (ConfigAttribute::DepthSize, i32::from(self.depth_size)),
            (ConfigAttribute::StencilSize, i32::from(self.stencil_size)),
        ]
    }

    /// Flat attribute list terminated by [`ConfigAttribute::None`], as native
    /// config choosers expect it
    pub fn to_raw_list(&self) -> Vec<i32> {
        let mut list: Vec<i32> = self
            .pairs()
            .iter()
            .flat_map(|&(key, value)| [key as i32, value])
            .collect();
        list.push(ConfigAttribute::None as i32);
        list
    }

    /// Whether a config reporting `available` can serve this request
    ///
    /// Channel sizes are minimums and every requested API bit must be present.
    pub const fn is_satisfied_by(&self, available: &Self) -> bool {
        available.renderable_type.contains(self.renderable_type)
            && available.red_size >= self.red_size
            && available.green_size >= self.green_size
            && available.blue_size >= self.blue_size
            && available.alpha_size >= self.alpha_size
            && available.depth_size >= self.depth_size
            && available.stencil_size >= self.stencil_size
    }
}

impl fmt::Display for FramebufferAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "R{}G{}B{}A{} D{} S{} ({:?})",
            self.red_size,
            self.green_size,
            self.blue_size,
            self.alpha_size,
            self.depth_size,
            self.stencil_size,
            self.renderable_type
        )
    }
}
