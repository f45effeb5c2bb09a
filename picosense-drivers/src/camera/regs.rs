//! OV7670 registers and configuration tables
//!
//! Tables are plain `(register, value)` sequences written in order. Which
//! table applies to a given size or colour format is decided by an
//! exhaustive `match`, so there is no index arithmetic to get wrong.

/// OV7670 register addresses
pub mod reg {
    /// AGC gain bits [7:0]
    pub const GAIN: u8 = 0x00;
    /// Vertical frame control
    pub const VREF: u8 = 0x03;
    /// Common control 2 (soft sleep, output drive)
    pub const COM2: u8 = 0x09;
    /// Product ID MSB (read-only, 0x76)
    pub const PID: u8 = 0x0A;
    /// Product ID LSB (read-only, 0x73)
    pub const VER: u8 = 0x0B;
    /// Common control 3 (scaling/DCW enable)
    pub const COM3: u8 = 0x0C;
    /// Common control 4
    pub const COM4: u8 = 0x0D;
    /// Common control 5
    pub const COM5: u8 = 0x0E;
    /// Common control 6
    pub const COM6: u8 = 0x0F;
    /// Internal clock prescaler
    pub const CLKRC: u8 = 0x11;
    /// Common control 7 (reset, output format)
    pub const COM7: u8 = 0x12;
    /// Common control 8 (AGC/AEC/AWB enables)
    pub const COM8: u8 = 0x13;
    /// Common control 9 (AGC ceiling)
    pub const COM9: u8 = 0x14;
    /// Common control 10 (sync polarity)
    pub const COM10: u8 = 0x15;
    /// Horizontal frame start high bits
    pub const HSTART: u8 = 0x17;
    /// Horizontal frame end high bits
    pub const HSTOP: u8 = 0x18;
    /// Vertical frame start high bits
    pub const VSTART: u8 = 0x19;
    /// Vertical frame end high bits
    pub const VSTOP: u8 = 0x1A;
    /// Mirror / vertical flip
    pub const MVFP: u8 = 0x1E;
    /// ADC control 1
    pub const ADCCTR1: u8 = 0x21;
    /// ADC control 2
    pub const ADCCTR2: u8 = 0x22;
    /// AGC/AEC stable operating region upper limit
    pub const AEW: u8 = 0x24;
    /// AGC/AEC stable operating region lower limit
    pub const AEB: u8 = 0x25;
    /// AGC/AEC fast mode operating region
    pub const VPT: u8 = 0x26;
    /// HREF control (edge offsets)
    pub const HREF: u8 = 0x32;
    /// Array current control
    pub const CHLF: u8 = 0x33;
    /// ADC control
    pub const ADC: u8 = 0x37;
    /// ADC and analog common mode control
    pub const ACOM: u8 = 0x38;
    /// ADC offset control
    pub const OFON: u8 = 0x39;
    /// Line buffer test option (output sequence)
    pub const TSLB: u8 = 0x3A;
    /// Common control 12
    pub const COM12: u8 = 0x3C;
    /// Common control 14 (DCW/scaling PCLK)
    pub const COM14: u8 = 0x3E;
    /// Common control 15 (output range, RGB variant)
    pub const COM15: u8 = 0x40;
    /// Common control 16 (AWB gain)
    pub const COM16: u8 = 0x41;
    /// Brightness
    pub const BRIGHT: u8 = 0x55;
    /// Contrast
    pub const CONTRAS: u8 = 0x56;
    /// Contrast centre
    pub const CONTRAS_CENTER: u8 = 0x57;
    /// Fix gain control
    pub const GFIX: u8 = 0x69;
    /// PLL control
    pub const DBLV: u8 = 0x6B;
    /// Horizontal scaling factor
    pub const SCALING_XSC: u8 = 0x70;
    /// Vertical scaling factor
    pub const SCALING_YSC: u8 = 0x71;
    /// Downsample control
    pub const SCALING_DCWCTR: u8 = 0x72;
    /// DSP scale PCLK divider
    pub const SCALING_PCLK_DIV: u8 = 0x73;
    /// Digital gain control
    pub const REG74: u8 = 0x74;
    /// Gamma curve slope
    pub const SLOP: u8 = 0x7A;
    /// Gamma curve base (15 consecutive registers)
    pub const GAM_BASE: u8 = 0x7B;
    /// RGB444 control
    pub const RGB444: u8 = 0x8C;
    /// Dummy line low 8 bits
    pub const DM_LNL: u8 = 0x92;
    /// 50Hz banding step limit
    pub const BD50MAX: u8 = 0xA5;
    /// 60Hz banding step limit
    pub const BD60MAX: u8 = 0xAB;
    /// Histogram AEC/AGC control 1
    pub const HAECC1: u8 = 0x9F;
    /// Histogram AEC/AGC control 2
    pub const HAECC2: u8 = 0xA0;
    /// Scaling PCLK delay
    pub const SCALING_PCLK_DELAY: u8 = 0xA2;
    /// Histogram AEC/AGC control 3
    pub const HAECC3: u8 = 0xA6;
    /// Histogram AEC/AGC control 4
    pub const HAECC4: u8 = 0xA7;
    /// Histogram AEC/AGC control 5
    pub const HAECC5: u8 = 0xA8;
    /// Histogram AEC/AGC control 6
    pub const HAECC6: u8 = 0xA9;
    /// Histogram AEC/AGC control 7
    pub const HAECC7: u8 = 0xAA;
    /// Auto black level calibration
    pub const ABLC1: u8 = 0xB1;
    /// ABLC target
    pub const THL_ST: u8 = 0xB3;
}

/// COM7: soft reset
pub const COM7_RESET: u8 = 0x80;
/// COM7: YUV output
pub const COM7_YUV: u8 = 0x00;
/// COM7: RGB output
pub const COM7_RGB: u8 = 0x04;
/// COM8: fast AGC/AEC
pub const COM8_FASTAEC: u8 = 0x80;
/// COM8: unlimited AEC step
pub const COM8_AECSTEP: u8 = 0x40;
/// COM8: banding filter
pub const COM8_BANDING: u8 = 0x20;
/// COM8: auto gain
pub const COM8_AGC: u8 = 0x04;
/// COM8: auto white balance
pub const COM8_AWB: u8 = 0x02;
/// COM8: auto exposure
pub const COM8_AEC: u8 = 0x01;
/// COM10: VSYNC negative
pub const COM10_VS_NEG: u8 = 0x02;
/// COM15: full 0x00-0xFF output range
pub const COM15_R00FF: u8 = 0xC0;
/// COM15: RGB565
pub const COM15_RGB565: u8 = 0x10;
/// COM16: AWB gain enable
pub const COM16_AWBGAIN: u8 = 0x08;
/// TSLB: UV ordering, Y last
pub const TSLB_YLAST: u8 = 0x04;
/// DBLV: PLL ×4
pub const DBLV_PLL_X4: u8 = 1 << 6;

/// Expected PID register value
pub const PRODUCT_ID: u8 = 0x76;
/// Expected VER register value
pub const PRODUCT_VERSION: u8 = 0x73;

/// One register write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterWrite {
    pub reg: u8,
    pub value: u8,
}

const fn w(reg: u8, value: u8) -> RegisterWrite {
    RegisterWrite { reg, value }
}

/// Output resolution, selected by DCW downsampling of the VGA array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameSize {
    /// 640×480
    Vga,
    /// 320×240 (÷2)
    Qvga,
    /// 160×120 (÷4)
    Qqvga,
    /// 80×60 (÷8)
    #[default]
    Qqqvga,
}

impl FrameSize {
    /// Width and height in pixels
    pub const fn dimensions(self) -> (u16, u16) {
        match self {
            FrameSize::Vga => (640, 480),
            FrameSize::Qvga => (320, 240),
            FrameSize::Qqvga => (160, 120),
            FrameSize::Qqqvga => (80, 60),
        }
    }

    /// Register table that selects this size
    pub fn table(self) -> &'static [RegisterWrite] {
        match self {
            FrameSize::Vga => SIZE_VGA,
            FrameSize::Qvga => SIZE_QVGA,
            FrameSize::Qqvga => SIZE_QQVGA,
            FrameSize::Qqqvga => SIZE_QQQVGA,
        }
    }
}

/// Pixel output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorFormat {
    /// RGB565, two bytes per pixel
    Rgb565,
    /// YUV422 as Y U Y V
    #[default]
    Yuv422,
}

impl ColorFormat {
    /// Register table that selects this format
    pub fn table(self) -> &'static [RegisterWrite] {
        match self {
            ColorFormat::Rgb565 => FORMAT_RGB565,
            ColorFormat::Yuv422 => FORMAT_YUV422,
        }
    }
}

/// Clock setup written right after reset: prescaler and PLL
pub const CLOCK_SETUP: &[RegisterWrite] = &[
    w(reg::CLKRC, 0x01),
    w(reg::DBLV, DBLV_PLL_X4),
];

/// Common setup: sync polarity, gamma, exposure/gain control, analog trims
pub const INIT_TABLE: &[RegisterWrite] = &[
    w(reg::TSLB, TSLB_YLAST),
    w(reg::COM10, COM10_VS_NEG),
    w(reg::SLOP, 0x20),
    w(reg::GAM_BASE, 0x1C),
    w(reg::GAM_BASE + 1, 0x28),
    w(reg::GAM_BASE + 2, 0x3C),
    w(reg::GAM_BASE + 3, 0x55),
    w(reg::GAM_BASE + 4, 0x68),
    w(reg::GAM_BASE + 5, 0x76),
    w(reg::GAM_BASE + 6, 0x80),
    w(reg::GAM_BASE + 7, 0x88),
    w(reg::GAM_BASE + 8, 0x8F),
    w(reg::GAM_BASE + 9, 0x96),
    w(reg::GAM_BASE + 10, 0xA3),
    w(reg::GAM_BASE + 11, 0xAF),
    w(reg::GAM_BASE + 12, 0xC4),
    w(reg::GAM_BASE + 13, 0xD7),
    w(reg::GAM_BASE + 14, 0xE8),
    // AGC/AEC off while their parameters are set
    w(reg::COM8, COM8_FASTAEC | COM8_AECSTEP | COM8_BANDING),
    w(reg::GAIN, 0x00),
    w(reg::COM2, 0x00),
    w(reg::COM4, 0x00),
    w(reg::COM9, 0x20),
    w(reg::BD50MAX, 0x05),
    w(reg::BD60MAX, 0x07),
    w(reg::AEW, 0x75),
    w(reg::AEB, 0x63),
    w(reg::VPT, 0xA5),
    w(reg::HAECC1, 0x78),
    w(reg::HAECC2, 0x68),
    w(reg::HAECC3, 0xDF),
    w(reg::HAECC4, 0xDF),
    w(reg::HAECC5, 0xF0),
    w(reg::HAECC6, 0x90),
    w(reg::HAECC7, 0x94),
    w(
        reg::COM8,
        COM8_FASTAEC | COM8_AECSTEP | COM8_BANDING | COM8_AGC | COM8_AEC | COM8_AWB,
    ),
    w(reg::COM5, 0x61),
    w(reg::COM6, 0x4B),
    w(reg::MVFP, 0x07),
    w(reg::ADCCTR1, 0x02),
    w(reg::ADCCTR2, 0x91),
    w(reg::CHLF, 0x0B),
    w(reg::ADC, 0x1D),
    w(reg::ACOM, 0x71),
    w(reg::OFON, 0x2A),
    w(reg::COM12, 0x78),
    w(reg::GFIX, 0x5D),
    w(reg::REG74, 0x19),
    w(reg::DM_LNL, 0x00),
    w(reg::ABLC1, 0x0C),
    w(reg::THL_ST, 0x82),
    w(reg::COM16, COM16_AWBGAIN),
    w(reg::BRIGHT, 0x00),
    w(reg::CONTRAS, 0x40),
    w(reg::CONTRAS_CENTER, 0x80),
];

const SIZE_VGA: &[RegisterWrite] = &[
    w(reg::COM3, 0x00),
    w(reg::COM14, 0x00),
    w(reg::SCALING_XSC, 0x3A),
    w(reg::SCALING_YSC, 0x35),
    w(reg::SCALING_DCWCTR, 0x11),
    w(reg::SCALING_PCLK_DIV, 0xF0),
    w(reg::SCALING_PCLK_DELAY, 0x02),
    w(reg::HSTART, 0x13),
    w(reg::HSTOP, 0x01),
    w(reg::HREF, 0xB6),
    w(reg::VSTART, 0x02),
    w(reg::VSTOP, 0x7A),
    w(reg::VREF, 0x0A),
];

const SIZE_QVGA: &[RegisterWrite] = &[
    w(reg::COM3, 0x04),
    w(reg::COM14, 0x19),
    w(reg::SCALING_XSC, 0x3A),
    w(reg::SCALING_YSC, 0x35),
    w(reg::SCALING_DCWCTR, 0x11),
    w(reg::SCALING_PCLK_DIV, 0xF1),
    w(reg::SCALING_PCLK_DELAY, 0x02),
    w(reg::HSTART, 0x16),
    w(reg::HSTOP, 0x04),
    w(reg::HREF, 0x24),
    w(reg::VSTART, 0x02),
    w(reg::VSTOP, 0x7A),
    w(reg::VREF, 0x0A),
];

const SIZE_QQVGA: &[RegisterWrite] = &[
    w(reg::COM3, 0x04),
    w(reg::COM14, 0x1A),
    w(reg::SCALING_XSC, 0x3A),
    w(reg::SCALING_YSC, 0x35),
    w(reg::SCALING_DCWCTR, 0x22),
    w(reg::SCALING_PCLK_DIV, 0xF2),
    w(reg::SCALING_PCLK_DELAY, 0x02),
    w(reg::HSTART, 0x16),
    w(reg::HSTOP, 0x04),
    w(reg::HREF, 0xA4),
    w(reg::VSTART, 0x02),
    w(reg::VSTOP, 0x7A),
    w(reg::VREF, 0x0A),
];

const SIZE_QQQVGA: &[RegisterWrite] = &[
    w(reg::COM3, 0x04),
    w(reg::COM14, 0x1B),
    w(reg::SCALING_XSC, 0x3A),
    w(reg::SCALING_YSC, 0x35),
    w(reg::SCALING_DCWCTR, 0x33),
    w(reg::SCALING_PCLK_DIV, 0xF3),
    w(reg::SCALING_PCLK_DELAY, 0x02),
    w(reg::HSTART, 0x16),
    w(reg::HSTOP, 0x04),
    w(reg::HREF, 0xA4),
    w(reg::VSTART, 0x02),
    w(reg::VSTOP, 0x7A),
    w(reg::VREF, 0x0A),
];

const FORMAT_RGB565: &[RegisterWrite] = &[
    w(reg::COM7, COM7_RGB),
    w(reg::RGB444, 0x00),
    w(reg::COM15, COM15_R00FF | COM15_RGB565),
];

const FORMAT_YUV422: &[RegisterWrite] = &[
    w(reg::COM7, COM7_YUV),
    w(reg::COM15, COM15_R00FF),
];
