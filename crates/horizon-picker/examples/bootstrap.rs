//! Horizon Picker headless walkthrough
//!
//! Drives a picker against the in-memory document and calendar, printing
//! every event the picker reports:
//! - mount with a seeded value and an options file
//! - a user pick, an edit cleared by hand, a close
//! - a hot configuration reload and a disabled toggle
//!
//! Run with: RUST_LOG=horizon_picker=trace cargo run -p horizon-picker --example bootstrap

use std::sync::Arc;

use horizon_picker::{
    global_hook_defaults, hook, AlertPreset, Config, DatePicker, Element, HookEvent,
    MemoryCalendarFactory, MemoryElement, ModelValue, PickerEvent, PickerProps,
};
use horizon_picker_core::TickQueue;

const OPTIONS: &str = r#"
dateFormat = "Y-m-d"
altInput = true
altFormat = "F j, Y"
locale = "en"
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    global_hook_defaults().set_default(
        HookEvent::Open,
        hook(|args| println!("  [default hook] calendar opened on {:?}", args.date_str)),
    );

    let ticks = Arc::new(TickQueue::new());
    let factory = Arc::new(MemoryCalendarFactory::new());
    let picker = DatePicker::new(
        PickerProps {
            model_value: ModelValue::from("2024-01-05"),
            config: Config::from_toml_str(OPTIONS)?,
            events: HookEvent::ALL.to_vec(),
            disabled: false,
        },
        factory.clone(),
        ticks.clone(),
    );

    picker.channel().connect(|event: &PickerEvent| match event {
        PickerEvent::Hook { args, .. } => println!("{} ({:?})", event.name(), args.date_str),
        PickerEvent::Blur(value) | PickerEvent::UpdateModelValue(value) => {
            println!("{} {:?}", event.name(), value)
        }
    });

    let input = MemoryElement::input();
    picker.render().attach(&input.as_element());
    picker.mount(input.as_element());
    println!("mounted, input shows {:?}", input.value());

    let calendar = factory.last().ok_or("no calendar was created")?;
    calendar.open();
    calendar.pick("2024-02-14");
    calendar.close();
    ticks.flush();

    input.type_text("");
    ticks.flush();

    if picker.on_config_changed(Config::from_toml_str(OPTIONS)?.with_option("locale", "fr")) {
        println!("reconfigured");
    }
    picker.on_disabled_changed(true);
    println!("focus input disabled: {:?}", picker.focus_input()?.attribute("disabled"));

    picker.unmount();
    println!("confirm dialog: {}", serde_json::to_string(&AlertPreset::CONFIRM)?);
    Ok(())
}
