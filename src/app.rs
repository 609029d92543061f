//! Wiring for the `retrack` binary: scene file in, re-styled scene file out.

use anyhow::Result;
use retrack_config::Config;
use retrack_fonts::{FontDescriptor, FontLoadError, FontLoader, MemoryFontLoader, SystemFontLoader};
use tokio::sync::mpsc;

use crate::cli::RuntimeOptions;
use crate::messages::{CommandReceiver, CommandSender, UiCommand, UiMessage, UiReceiver};
use crate::scene::MemoryDocument;
use crate::session::Session;

/// Font loader chosen from config and CLI flags.
#[derive(Debug)]
pub enum HostFontLoader {
    System(SystemFontLoader),
    Assumed(MemoryFontLoader),
}

impl HostFontLoader {
    pub fn new(verify_system_fonts: bool) -> Self {
        if verify_system_fonts {
            HostFontLoader::System(SystemFontLoader::new())
        } else {
            log::info!("Font verification disabled, assuming every font is installed");
            HostFontLoader::Assumed(MemoryFontLoader::new())
        }
    }
}

impl FontLoader for HostFontLoader {
    async fn load_font(&self, font: &FontDescriptor) -> Result<(), FontLoadError> {
        match self {
            HostFontLoader::System(loader) => loader.load_font(font).await,
            HostFontLoader::Assumed(loader) => loader.load_font(font).await,
        }
    }
}

/// Fold CLI overrides into the loaded config.
pub fn effective_config(options: &RuntimeOptions, mut config: Config) -> Config {
    if let Some(apply) = options.apply_tracking {
        config.apply_tracking = apply;
    }
    if options.exclude_instance_children {
        config.exclude_instance_children = true;
    }
    if options.assume_fonts {
        config.verify_system_fonts = false;
    }
    config
}

/// Print UI messages the way a host shell would surface them.
async fn print_messages(mut rx: UiReceiver) {
    while let Some(msg) = rx.recv().await {
        match msg {
            UiMessage::SelectionChanged { .. } => log::debug!("{}", msg),
            UiMessage::Progress { .. } => eprintln!("{}", msg),
            UiMessage::Notice { .. } => eprintln!("retrack: {}", msg),
            UiMessage::Close { message: Some(_) } => println!("{}", msg),
            UiMessage::Close { message: None } => {}
        }
    }
}

/// Run the binary. Returns the process exit code.
pub async fn run(options: &RuntimeOptions, config: Config) -> Result<i32> {
    let config = effective_config(options, config);
    let mut doc = MemoryDocument::load(&options.scene)?;
    let loader = HostFontLoader::new(config.verify_system_fonts);

    let (ui_tx, ui_rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(print_messages(ui_rx));

    let (code, outcome) = {
        let mut session = Session::new(&mut doc, &loader, &config, ui_tx);
        if options.check_only {
            let has_text = session.selection_has_text();
            println!(
                "{}",
                if has_text {
                    "selection contains text"
                } else {
                    "selection contains no text"
                }
            );
            (if has_text { 0 } else { 1 }, None)
        } else {
            let (cmd_tx, cmd_rx): (CommandSender, CommandReceiver) = mpsc::unbounded_channel();
            cmd_tx.send(UiCommand::Start {
                apply_tracking: config.apply_tracking,
            })?;
            let outcome = session.serve(cmd_rx).await;
            let code = match &outcome {
                Some(Ok(_)) => 0,
                _ => 1,
            };
            (code, outcome)
        }
    };
    // The session owned the last sender; the printer drains and exits.
    printer.await?;

    if let Some(Ok(_)) = outcome {
        let output = options.output.as_deref().unwrap_or(&options.scene);
        doc.save(output)?;
        log::info!("Wrote re-styled scene to {:?}", output);
    }
    Ok(code)
}
