use crate::config::DisplayConfig as PanelConfig;
use crate::display::{DisplayError, Surface, TextItem};
use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};
use linux_embedded_hal::I2cdev;
use ssd1306::{mode::BufferedGraphicsMode, prelude::*, I2CDisplayInterface, Ssd1306};
use tracing::info;

type Panel = Ssd1306<
    I2CInterface<I2cdev>,
    DisplaySize128x32,
    BufferedGraphicsMode<DisplaySize128x32>,
>;

/// SSD1306 128x32 panel on a Linux I2C bus, drawn through an off-screen
/// buffer.
pub struct Oled {
    panel: Panel,
}

impl Oled {
    pub fn open(cfg: &PanelConfig) -> Result<Self, DisplayError> {
        let i2c = I2cdev::new(&cfg.i2c_bus).map_err(|err| DisplayError::Bus {
            path: cfg.i2c_bus.clone(),
            reason: err.to_string(),
        })?;

        let interface = I2CDisplayInterface::new_custom_address(i2c, cfg.address);
        let mut panel = Ssd1306::new(interface, DisplaySize128x32, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        panel
            .init()
            .map_err(|err| DisplayError::Init(format!("{err:?}")))?;

        info!(bus = %cfg.i2c_bus, address = cfg.address, "display initialised");
        Ok(Self { panel })
    }
}

impl Surface for Oled {
    fn begin_frame(&mut self) -> Result<(), DisplayError> {
        DrawTarget::clear(&mut self.panel, BinaryColor::Off)
            .map_err(|err| DisplayError::Clear(format!("{err:?}")))
    }

    fn draw_text(&mut self, item: &TextItem) -> Result<(), DisplayError> {
        item.draw(&mut self.panel).map_err(|err| DisplayError::Draw {
            text: item.text.clone(),
            reason: format!("{err:?}"),
        })
    }

    fn commit(&mut self) -> Result<(), DisplayError> {
        self.panel
            .flush()
            .map_err(|err| DisplayError::Flush(format!("{err:?}")))
    }

    fn blank(&mut self) -> Result<(), DisplayError> {
        self.begin_frame()?;
        self.commit()
    }
}
