use std::collections::VecDeque;
use tempfile::TempDir;
use vehicle_core::{
    build_controller, CatalogCommand, CatalogError, DbError, ErrorCategory, FlowOutcome,
    InteractiveController, MessageKind, RepoResult, SqliteFile, SqliteVehicleRepository,
    StorageError, StorageOp, ValidationError, Vehicle, VehicleController, VehicleData, VehicleId,
    VehicleInput, VehiclePresenter, VehicleRepository, VehicleService,
};

type Controller = VehicleController<SqliteVehicleRepository<SqliteFile>>;

#[test]
fn catalog_lifecycle_scenario() {
    let (_dir, controller) = open_controller();

    let created = controller
        .add_vehicle(VehicleData::new("Toyota", "Corolla", 2020, "Blue", 20_000.0))
        .unwrap();
    assert_eq!(created.id(), Some(VehicleId::new(1)));

    let all = controller.list_vehicles().unwrap();
    assert_eq!(all, vec![created.clone()]);

    let mut repriced = created.clone();
    repriced.data_mut().price = 21_000.0;
    controller.update_vehicle(repriced).unwrap();
    let loaded = controller.find_vehicle(VehicleId::new(1)).unwrap().unwrap();
    assert_eq!(loaded.data().price, 21_000.0);

    assert!(controller.delete_vehicle(VehicleId::new(1)).unwrap());
    assert!(controller.list_vehicles().unwrap().is_empty());
}

#[test]
fn update_of_unknown_id_is_categorized_not_found() {
    let (_dir, controller) = open_controller();

    let err = controller
        .update_vehicle(Vehicle::persisted(VehicleId::new(5), corolla()))
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::NotFound);
    assert_eq!(err.to_string(), "vehicle not found: 5");
}

#[test]
fn invalid_data_is_rejected_before_reaching_storage() {
    let (_dir, controller) = open_controller();

    let mut blank_make = corolla();
    blank_make.make = "  ".to_string();
    let err = controller.add_vehicle(blank_make).unwrap_err();

    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::Blank { field: "make" })
    ));
    assert!(controller.list_vehicles().unwrap().is_empty());
}

#[test]
fn add_from_input_reports_unparsable_numbers() {
    let (_dir, controller) = open_controller();

    let input = VehicleInput {
        make: "Toyota".to_string(),
        model: "Corolla".to_string(),
        year: "2020".to_string(),
        color: "Blue".to_string(),
        price: "cheap".to_string(),
    };
    let err = controller.add_vehicle_from_input(&input).unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Validation);
    assert!(controller.list_vehicles().unwrap().is_empty());
}

#[test]
fn storage_failure_is_categorized_storage() {
    let dir = tempfile::tempdir().unwrap();
    let db_dir = dir.path().join("db");
    std::fs::create_dir(&db_dir).unwrap();
    let controller = build_controller(SqliteFile::new(db_dir.join("catalog.db"))).unwrap();

    std::fs::remove_dir_all(&db_dir).unwrap();
    let err = controller.list_vehicles().unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Storage);
}

#[test]
fn interactive_add_then_list_shows_assigned_id() {
    let (_dir, controller) = open_controller();
    let interactive = InteractiveController::new(&controller);
    let mut presenter = ScriptedPresenter::default();
    presenter.inputs.push_back(form("Toyota", "Corolla", "2020", "Blue", "20000"));

    assert_eq!(interactive.add_vehicle(&mut presenter), FlowOutcome::Completed);
    assert_eq!(interactive.list_vehicles(&mut presenter), FlowOutcome::Completed);

    assert_eq!(
        presenter.messages,
        vec![(
            MessageKind::Success,
            "Vehicle added successfully with ID: 1".to_string()
        )]
    );
    assert_eq!(presenter.shown_lists.len(), 1);
    assert_eq!(presenter.shown_lists[0][0].data().model, "Corolla");
}

#[test]
fn interactive_add_with_bad_number_shows_error_message() {
    let (_dir, controller) = open_controller();
    let interactive = InteractiveController::new(&controller);
    let mut presenter = ScriptedPresenter::default();
    presenter.inputs.push_back(form("Toyota", "Corolla", "20x0", "Blue", "1"));

    let outcome = interactive.add_vehicle(&mut presenter);

    assert_eq!(outcome, FlowOutcome::Failed(ErrorCategory::Validation));
    let (kind, message) = presenter.messages.last().unwrap();
    assert_eq!(*kind, MessageKind::Error);
    assert!(message.starts_with("Error adding vehicle: Invalid number format"));
}

#[test]
fn interactive_list_on_empty_catalog_says_so() {
    let (_dir, controller) = open_controller();
    let interactive = InteractiveController::new(&controller);
    let mut presenter = ScriptedPresenter::default();

    interactive.list_vehicles(&mut presenter);

    assert_eq!(
        presenter.messages,
        vec![(MessageKind::Info, "No vehicles found.".to_string())]
    );
    assert!(presenter.shown_lists.is_empty());
}

#[test]
fn interactive_find_handles_present_missing_and_malformed_ids() {
    let (_dir, controller) = open_controller();
    let created = controller.add_vehicle(corolla()).unwrap();
    let interactive = InteractiveController::new(&controller);
    let mut presenter = ScriptedPresenter::default();
    presenter.ids.extend(["1".to_string(), "2".to_string(), "abc".to_string()]);

    assert_eq!(interactive.find_vehicle(&mut presenter), FlowOutcome::Completed);
    assert_eq!(presenter.shown, vec![created]);

    assert_eq!(interactive.find_vehicle(&mut presenter), FlowOutcome::Completed);
    assert_eq!(presenter.messages.last().unwrap().1, "Vehicle not found.");

    assert_eq!(
        interactive.find_vehicle(&mut presenter),
        FlowOutcome::Failed(ErrorCategory::Validation)
    );
}

#[test]
fn interactive_update_keeps_blank_fields() {
    let (_dir, controller) = open_controller();
    controller.add_vehicle(corolla()).unwrap();
    let interactive = InteractiveController::new(&controller);
    let mut presenter = ScriptedPresenter::default();
    presenter.ids.push_back("1".to_string());
    presenter.inputs.push_back(form("", "", "", "Green", "21000"));

    assert_eq!(interactive.update_vehicle(&mut presenter), FlowOutcome::Completed);

    let loaded = controller.find_vehicle(VehicleId::new(1)).unwrap().unwrap();
    assert_eq!(loaded.data().make, "Toyota");
    assert_eq!(loaded.data().year, 2020);
    assert_eq!(loaded.data().color, "Green");
    assert_eq!(loaded.data().price, 21_000.0);
    assert_eq!(
        presenter.messages.last().unwrap().1,
        "Vehicle updated successfully."
    );
}

#[test]
fn interactive_update_and_delete_of_missing_vehicle_report_not_found() {
    let (_dir, controller) = open_controller();
    let interactive = InteractiveController::new(&controller);
    let mut presenter = ScriptedPresenter::default();
    presenter.ids.extend(["9".to_string(), "9".to_string()]);

    assert_eq!(
        interactive.update_vehicle(&mut presenter),
        FlowOutcome::Failed(ErrorCategory::NotFound)
    );
    assert_eq!(
        interactive.delete_vehicle(&mut presenter),
        FlowOutcome::Failed(ErrorCategory::NotFound)
    );
    assert!(presenter
        .messages
        .iter()
        .all(|(kind, message)| *kind == MessageKind::Error && message == "Vehicle not found."));
}

#[test]
fn interactive_delete_removes_vehicle() {
    let (_dir, controller) = open_controller();
    controller.add_vehicle(corolla()).unwrap();
    let interactive = InteractiveController::new(&controller);
    let mut presenter = ScriptedPresenter::default();
    presenter.ids.push_back("1".to_string());

    assert_eq!(interactive.delete_vehicle(&mut presenter), FlowOutcome::Completed);
    assert!(controller.list_vehicles().unwrap().is_empty());
}

#[test]
fn cancelled_prompts_do_nothing() {
    let (_dir, controller) = open_controller();
    let interactive = InteractiveController::new(&controller);
    let mut presenter = ScriptedPresenter::default();

    assert_eq!(interactive.add_vehicle(&mut presenter), FlowOutcome::Cancelled);
    assert_eq!(interactive.find_vehicle(&mut presenter), FlowOutcome::Cancelled);
    assert_eq!(interactive.delete_vehicle(&mut presenter), FlowOutcome::Cancelled);
    assert!(presenter.messages.is_empty());
}

#[test]
fn web_commands_return_refreshed_list() {
    let (_dir, controller) = open_controller();
    let interactive = InteractiveController::new(&controller);

    let added = interactive.handle_command(
        r#"addVehicle:{"id":null,"make":"Toyota","model":"Corolla","year":2020,"color":"Blue","price":20000.0}"#,
    );
    assert!(added.ok, "{}", added.message);
    assert_eq!(added.message, "Vehicle added successfully!");
    assert_eq!(added.vehicles.len(), 1);

    let updated = interactive.handle_command(
        r#"updateVehicle:{"id":1,"make":"Toyota","model":"Corolla","year":2020,"color":"Blue","price":21000.0}"#,
    );
    assert!(updated.ok, "{}", updated.message);
    assert_eq!(updated.vehicles[0].data().price, 21_000.0);

    let listed = interactive.handle_command("listVehicles:");
    assert!(listed.ok);
    assert_eq!(listed.vehicles.len(), 1);

    let deleted = interactive.handle_command("deleteVehicle:1");
    assert!(deleted.ok);
    assert!(deleted.vehicles.is_empty());
}

#[test]
fn web_commands_accept_uri_encoded_payloads() {
    let (_dir, controller) = open_controller();
    let interactive = InteractiveController::new(&controller);

    let added = interactive.handle_command(
        "addVehicle:%7B%22id%22%3Anull%2C%22make%22%3A%22Toyota%22%2C%22model%22%3A%22Corolla%22\
         %2C%22year%22%3A2020%2C%22color%22%3A%22Dark%20Blue%22%2C%22price%22%3A20000%7D",
    );
    assert!(added.ok, "{}", added.message);
    assert_eq!(added.vehicles.len(), 1);
    assert_eq!(added.vehicles[0].data().color, "Dark Blue");

    let updated = interactive.handle_command(
        "updateVehicle:%7B%22id%22%3A1%2C%22make%22%3A%22Toyota%22%2C%22model%22%3A%22Corolla%22\
         %2C%22year%22%3A2020%2C%22color%22%3A%22Dark+Blue%22%2C%22price%22%3A21000.5%7D",
    );
    assert!(updated.ok, "{}", updated.message);
    assert_eq!(updated.vehicles[0].data().price, 21_000.5);
    assert_eq!(updated.vehicles[0].data().color, "Dark Blue");
}

#[test]
fn undecodable_payload_is_malformed() {
    assert!(matches!(
        CatalogCommand::parse("addVehicle:%FF%FE"),
        Err(ValidationError::MalformedPayload(_))
    ));
}

#[test]
fn refresh_failure_after_successful_action_is_reported_separately() {
    let (dir, controller) = open_controller();
    let stored = controller.add_vehicle(corolla()).unwrap();
    let repo = SqliteVehicleRepository::open(SqliteFile::new(dir.path().join("catalog.db")))
        .unwrap();
    let controller = VehicleController::new(VehicleService::new(ListOffline { inner: &repo }));
    let interactive = InteractiveController::new(&controller);

    let response = interactive.handle_command(&format!("deleteVehicle:{}", stored.id().unwrap()));

    assert!(response.ok);
    assert_eq!(response.kind, MessageKind::Success);
    assert_eq!(response.message, "Vehicle deleted successfully!");
    assert!(response.vehicles.is_empty());
    assert!(response
        .refresh_error
        .as_deref()
        .unwrap()
        .starts_with("Error loading vehicles: failed to find vehicle"));
    assert!(repo.find_by_id(stored.id().unwrap()).unwrap().is_none());
}

#[test]
fn web_update_without_id_is_not_found() {
    let (_dir, controller) = open_controller();
    let interactive = InteractiveController::new(&controller);

    let response = interactive.handle_command(
        r#"updateVehicle:{"make":"Toyota","model":"Corolla","year":2020,"color":"Blue","price":1.0}"#,
    );

    assert!(!response.ok);
    assert_eq!(response.kind, MessageKind::Error);
    assert!(response.message.starts_with("Error updating vehicle: vehicle not found"));
    assert!(controller.list_vehicles().unwrap().is_empty());
}

#[test]
fn web_response_serializes_for_front_end() {
    let (_dir, controller) = open_controller();
    controller.add_vehicle(corolla()).unwrap();
    let interactive = InteractiveController::new(&controller);

    let response = interactive.handle_command("bogus");
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["ok"], false);
    assert_eq!(json["kind"], "error");
    assert_eq!(json["vehicles"][0]["id"], 1);
    assert!(json.get("refresh_error").is_none());
}

/// Repository whose listing always fails while single-row calls pass through.
struct ListOffline<'a> {
    inner: &'a SqliteVehicleRepository<SqliteFile>,
}

impl VehicleRepository for ListOffline<'_> {
    fn save(&self, vehicle: Vehicle) -> RepoResult<Vehicle> {
        self.inner.save(vehicle)
    }

    fn find_by_id(&self, id: VehicleId) -> RepoResult<Option<Vehicle>> {
        self.inner.find_by_id(id)
    }

    fn find_all(&self) -> RepoResult<Vec<Vehicle>> {
        let err = DbError::Sqlite(rusqlite::Error::InvalidQuery);
        Err(StorageError::new(StorageOp::Find, err).into())
    }

    fn delete_by_id(&self, id: VehicleId) -> RepoResult<bool> {
        self.inner.delete_by_id(id)
    }
}

fn open_controller() -> (TempDir, Controller) {
    let dir = tempfile::tempdir().unwrap();
    let controller = build_controller(SqliteFile::new(dir.path().join("catalog.db"))).unwrap();
    (dir, controller)
}

fn corolla() -> VehicleData {
    VehicleData::new("Toyota", "Corolla", 2020, "Blue", 20_000.0)
}

fn form(make: &str, model: &str, year: &str, color: &str, price: &str) -> VehicleInput {
    VehicleInput {
        make: make.to_string(),
        model: model.to_string(),
        year: year.to_string(),
        color: color.to_string(),
        price: price.to_string(),
    }
}

#[derive(Default)]
struct ScriptedPresenter {
    inputs: VecDeque<VehicleInput>,
    ids: VecDeque<String>,
    shown: Vec<Vehicle>,
    shown_lists: Vec<Vec<Vehicle>>,
    messages: Vec<(MessageKind, String)>,
}

impl VehiclePresenter for ScriptedPresenter {
    fn read_vehicle_input(&mut self) -> Option<VehicleInput> {
        self.inputs.pop_front()
    }

    fn read_vehicle_update(&mut self, _existing: &Vehicle) -> Option<VehicleInput> {
        self.inputs.pop_front()
    }

    fn read_vehicle_id(&mut self) -> Option<String> {
        self.ids.pop_front()
    }

    fn show_vehicle(&mut self, vehicle: &Vehicle) {
        self.shown.push(vehicle.clone());
    }

    fn show_vehicles(&mut self, vehicles: &[Vehicle]) {
        self.shown_lists.push(vehicles.to_vec());
    }

    fn show_message(&mut self, kind: MessageKind, message: &str) {
        self.messages.push((kind, message.to_string()));
    }
}
