use memdev::hardware::scan_system;
use memdev::{InventoryConfig, MemoryDevice};

use crate::cli::Commands;
use crate::output::{output_data, output_display, print_warning};

pub fn handle_memory_command(cmd: &Commands, config: &InventoryConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Inventory { format } => {
            let device = MemoryDevice::scan(config);
            output_display(&device.report(), format)?;
        }
        Commands::Module { index, format } => {
            let device = MemoryDevice::scan(config);
            if *index >= device.count() {
                print_warning(&format!(
                    "module index {} out of range ({} modules found)",
                    index,
                    device.count()
                ));
            }
            output_display(&device.module_summary(*index), format)?;
        }
        Commands::Records { format } => {
            let device = MemoryDevice::scan(config);
            output_data(&device.records(), format)?;
        }
        Commands::Usage { format } => {
            let counters = memdev::hardware::parse_counters(&config.meminfo_path);
            output_display(&counters, format)?;
        }
        Commands::Tree { format } => {
            let root = scan_system(&config.dmi_table_path)?;
            output_data(&root, format)?;
        }
    }
    Ok(())
}
