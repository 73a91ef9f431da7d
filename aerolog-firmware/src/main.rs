//! Aerolog - CO2 / Climate Monitor Firmware
//!
//! Main firmware binary for the STM32F042K6 board: an MH-Z19 CO2 sensor on
//! USART2, a DHT22 on PA0, a 128x64 SSD1306 OLED on I2C1 and a rotary
//! encoder with push button for navigation.
//!
//! Pin map:
//!
//! | Function        | Pin        |
//! |-----------------|------------|
//! | DHT22 data      | PA0        |
//! | Encoder button  | PA1 (EXTI) |
//! | MH-Z19 RX / TX  | PA2 / PA3  |
//! | Encoder A / B   | PA4 / PA5  |
//! | OLED SCL / SDA  | PB6 / PB7  |

#![no_std]
#![no_main]

extern crate alloc;

use core::mem::MaybeUninit;

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::adc::{self, Adc};
use embassy_stm32::exti::{self, ExtiInput};
use embassy_stm32::gpio::{Input, Level, OutputOpenDrain, Pull, Speed};
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::peripherals::{ADC1, USART2};
use embassy_stm32::usart::{self, BufferedUart};
use embassy_stm32::{bind_interrupts, interrupt};
use embassy_time::{Delay, Duration};
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use aerolog_core::config::{parse_config, MonitorConfig};
use aerolog_core::Monitor;
use aerolog_drivers::display::Ssd1306;
use aerolog_drivers::sensor::{Dht22, Mhz19};

use crate::sensors::Sensors;

mod channels;
mod sensors;
mod tasks;

// Heap for the glyph printers' column buffers
#[global_allocator]
static HEAP: Heap = Heap::empty();

// The F042 has 6 KB of RAM; the printers need well under 256 bytes
const HEAP_SIZE: usize = 1024;

/// Embedded configuration (compiled into firmware)
/// Edit monitor.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../monitor.toml");

/// MH-Z19 UART speed, fixed by the sensor
const CO2_BAUD: u32 = 9600;

bind_interrupts!(struct Irqs {
    USART2 => usart::BufferedInterruptHandler<USART2>;
    ADC1 => adc::InterruptHandler<ADC1>;
    EXTI0_1 => exti::InterruptHandler<interrupt::typelevel::EXTI0_1>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 32]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Aerolog firmware starting...");

    init_heap();

    let p = embassy_stm32::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    info!(
        "Config: poll {} ms, log every {} polls ({} s history)",
        config.poll_interval_ms,
        config.log_every,
        config.history_span_s()
    );

    // OLED on I2C1 (PB6 = SCL, PB7 = SDA)
    let mut i2c_config = i2c::Config::default();
    i2c_config.timeout = Duration::from_millis(100);
    let i2c = I2c::new_blocking(p.I2C1, p.PB6, p.PB7, i2c_config);
    let mut display = Ssd1306::new(i2c);
    if let Err(e) = display.init(config.contrast) {
        error!("Display init failed: {}", e);
    }
    info!("I2C1 initialized for SSD1306");

    // MH-Z19 on USART2 (PA3 = RX, PA2 = TX)
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = CO2_BAUD;
    let tx_buf = TX_BUF.init([0u8; 16]);
    let rx_buf = RX_BUF.init([0u8; 32]);
    let uart = BufferedUart::new(
        p.USART2,
        p.PA3, // RX
        p.PA2, // TX
        tx_buf,
        rx_buf,
        Irqs,
        uart_config,
    )
    .unwrap();
    info!("USART2 initialized for MH-Z19");

    // DHT22 on PA0, open drain with the module's pull-up
    let dht_pin = OutputOpenDrain::new(p.PA0, Level::High, Speed::Low);
    let climate = Dht22::new(dht_pin, Delay);

    // Supply voltage through the internal reference
    let mut adc = Adc::new(p.ADC1, Irqs);
    let vrefint = adc.enable_vref();

    let mut co2 = Mhz19::new(uart);
    match co2.set_auto_calibration(config.co2_auto_calibration).await {
        Ok(()) => info!("MH-Z19 auto calibration: {}", config.co2_auto_calibration),
        Err(e) => warn!("MH-Z19 auto calibration not set: {}", e),
    }

    let sensors = Sensors::new(co2, climate, adc, vrefint);

    // Encoder (PA4/PA5) and its push button (PA1)
    let encoder_a = Input::new(p.PA4, Pull::Up);
    let encoder_b = Input::new(p.PA5, Pull::Up);
    let button = ExtiInput::new(p.PA1, p.EXTI1, Pull::Up, Irqs);
    info!("Input initialized");

    let monitor = Monitor::new(config);

    spawner
        .spawn(tasks::monitor_task(monitor, display, sensors))
        .unwrap();
    spawner
        .spawn(tasks::encoder_task(encoder_a, encoder_b))
        .unwrap();
    spawner.spawn(tasks::button_task(button)).unwrap();
    spawner
        .spawn(tasks::debounce_task(config.debounce_ms))
        .unwrap();

    info!("All tasks spawned, monitor running");
}

/// Initialize the heap allocator
fn init_heap() {
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE);
    }
}

/// Parse the embedded monitor.toml, falling back to defaults
fn load_config() -> MonitorConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Loaded embedded config");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {}", e);
            warn!("Using default configuration");
            MonitorConfig::default()
        }
    }
}
