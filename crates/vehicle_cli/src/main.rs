//! Console front end for the vehicle catalog.
//!
//! # Responsibility
//! - Resolve configuration and wire repository, service and controller.
//! - Run a stdin/stdout menu loop on top of `InteractiveController`.

use log::error;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use vehicle_core::{
    build_controller, init_logging_from_config, CatalogConfig, FlowOutcome,
    InteractiveController, MessageKind, Vehicle, VehicleInput, VehiclePresenter,
};

const MENU: &str = "
1. Add new vehicle
2. List all vehicles
3. Find vehicle by ID
4. Update vehicle
5. Delete vehicle
6. Exit";

fn main() -> ExitCode {
    let config = match CatalogConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("logging disabled: {err}");
    }

    let controller = match build_controller(config.connection_source()) {
        Ok(controller) => controller,
        Err(err) => {
            error!("event=cli_start module=cli status=error error={err}");
            eprintln!("failed to open vehicle catalog: {err}");
            return ExitCode::FAILURE;
        }
    };
    let interactive = InteractiveController::new(&controller);
    let mut console = Console::new(io::stdin().lock(), io::stdout());

    println!("Vehicle Inventory Management System");
    println!("catalog: {}", config.db_path.display());
    loop {
        println!("{MENU}");
        let Some(choice) = console.prompt("Choose an option: ") else {
            break;
        };
        let outcome = match choice.as_str() {
            "1" => interactive.add_vehicle(&mut console),
            "2" => interactive.list_vehicles(&mut console),
            "3" => interactive.find_vehicle(&mut console),
            "4" => interactive.update_vehicle(&mut console),
            "5" => interactive.delete_vehicle(&mut console),
            "6" => break,
            _ => {
                console.show_message(MessageKind::Error, "Invalid option.");
                continue;
            }
        };
        if outcome == FlowOutcome::Cancelled {
            console.show_message(MessageKind::Info, "Cancelled.");
        }
    }

    ExitCode::SUCCESS
}

/// Line-oriented presenter. End of input cancels the current prompt.
struct Console<In, Out> {
    input: In,
    output: Out,
}

impl<In: BufRead, Out: Write> Console<In, Out> {
    fn new(input: In, output: Out) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, label: &str) -> Option<String> {
        let _ = write!(self.output, "{label}");
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn read_form(&mut self, hint: Option<&Vehicle>) -> Option<VehicleInput> {
        let label = |field: &str, current: Option<String>| match current {
            Some(current) => format!("{field} [{current}]: "),
            None => format!("{field}: "),
        };
        let data = hint.map(Vehicle::data);
        Some(VehicleInput {
            make: self.prompt(&label("Make", data.map(|d| d.make.clone())))?,
            model: self.prompt(&label("Model", data.map(|d| d.model.clone())))?,
            year: self.prompt(&label("Year", data.map(|d| d.year.to_string())))?,
            color: self.prompt(&label("Color", data.map(|d| d.color.clone())))?,
            price: self.prompt(&label("Price", data.map(|d| d.price.to_string())))?,
        })
    }
}

impl<In: BufRead, Out: Write> VehiclePresenter for Console<In, Out> {
    fn read_vehicle_input(&mut self) -> Option<VehicleInput> {
        self.read_form(None)
    }

    fn read_vehicle_update(&mut self, existing: &Vehicle) -> Option<VehicleInput> {
        let _ = writeln!(self.output, "Leave a field blank to keep its current value.");
        self.read_form(Some(existing))
    }

    fn read_vehicle_id(&mut self) -> Option<String> {
        self.prompt("Vehicle ID: ")
    }

    fn show_vehicle(&mut self, vehicle: &Vehicle) {
        let _ = writeln!(self.output, "\nVehicle Details:\n{vehicle}");
    }

    fn show_vehicles(&mut self, vehicles: &[Vehicle]) {
        let _ = writeln!(self.output, "\nAll Vehicles:");
        for vehicle in vehicles {
            let _ = writeln!(self.output, "{vehicle}");
        }
    }

    fn show_message(&mut self, kind: MessageKind, message: &str) {
        let _ = match kind {
            MessageKind::Error => writeln!(self.output, "\n[error] {message}"),
            MessageKind::Info | MessageKind::Success => writeln!(self.output, "\n{message}"),
        };
    }
}
