//! Role-specific appointment screen.
//!
//! The variant is picked once, when the user authenticates. Doctors get
//! a read-only list of patient bookings with a remove action; patients
//! get a booking form, a list scoped to the name they typed, and a
//! cancel action. Every create or delete reloads the list from the store.

use chrono::Local;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::{require, AuthenticatedUser, FlowError};
use crate::models::{Appointment, NewAppointment, Role};
use crate::store::AppointmentStore;

pub const SUPPORTIVE_QUOTES: [&str; 4] = [
    "Remember, your health is your wealth!",
    "Stay positive and keep pushing forward. You're stronger than you think!",
    "Every journey starts with a single step. Keep moving forward!",
    "Don't forget to take care of yourself. You deserve it!",
];

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Pick one of [`SUPPORTIVE_QUOTES`] at random.
pub fn supportive_quote() -> &'static str {
    SUPPORTIVE_QUOTES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(SUPPORTIVE_QUOTES[0])
}

/// Result of a remove/cancel request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(Appointment),
    /// The user answered "no" to the confirmation prompt.
    Declined,
}

// ═══════════════════════════════════════════
// Booking form
// ═══════════════════════════════════════════

/// Patient booking form. Date and time start at "now".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentForm {
    pub name: String,
    pub contact: String,
    pub date: String,
    pub time: String,
}

impl Default for AppointmentForm {
    fn default() -> Self {
        let now = Local::now();
        Self {
            name: String::new(),
            contact: String::new(),
            date: now.format(DATE_FORMAT).to_string(),
            time: now.format(TIME_FORMAT).to_string(),
        }
    }
}

impl AppointmentForm {
    /// All four fields are required; formats are not checked.
    pub fn validate(&self) -> Result<NewAppointment, FlowError> {
        require("name", &self.name)?;
        require("contact", &self.contact)?;
        require("date", &self.date)?;
        require("time", &self.time)?;
        Ok(NewAppointment {
            name: self.name.clone(),
            contact: self.contact.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
        })
    }

    /// Blank name/contact, date and time back to now.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ═══════════════════════════════════════════
// Shared capabilities
// ═══════════════════════════════════════════

/// What every appointment screen can do, whatever the role.
pub trait AppointmentScreen {
    fn role(&self) -> Role;

    fn username(&self) -> &str;

    /// Motivational line picked when the screen was built.
    fn quote(&self) -> &'static str;

    /// Rows as of the last reload.
    fn appointments(&self) -> &[Appointment];

    /// Reload the list from the store.
    fn refresh(&mut self) -> Result<(), FlowError>;

    /// Delete the selected row after `confirm` agrees, then reload.
    fn remove<F>(&mut self, selected: Option<i64>, confirm: F) -> Result<RemoveOutcome, FlowError>
    where
        F: FnOnce(&Appointment) -> bool;

    fn title(&self) -> String {
        format!("Hi {}, Welcome to Appointment Manager", self.role())
    }
}

/// Shared body of the doctor "delete" and patient "cancel" actions.
fn remove_selected<F>(
    store: &AppointmentStore,
    rows: &[Appointment],
    selected: Option<i64>,
    confirm: F,
) -> Result<RemoveOutcome, FlowError>
where
    F: FnOnce(&Appointment) -> bool,
{
    let target = selected
        .and_then(|id| rows.iter().find(|a| a.id == id))
        .ok_or(FlowError::NoSelectionMade)?;

    if !confirm(target) {
        return Ok(RemoveOutcome::Declined);
    }

    store.delete_by_id(target.id)?;
    Ok(RemoveOutcome::Removed(target.clone()))
}

// ═══════════════════════════════════════════
// Doctor view
// ═══════════════════════════════════════════

pub struct DoctorView<'s> {
    store: &'s AppointmentStore,
    username: String,
    quote: &'static str,
    appointments: Vec<Appointment>,
}

impl<'s> DoctorView<'s> {
    pub fn open(store: &'s AppointmentStore, username: &str) -> Result<Self, FlowError> {
        let mut view = Self {
            store,
            username: username.to_string(),
            quote: supportive_quote(),
            appointments: Vec::new(),
        };
        view.refresh()?;
        Ok(view)
    }
}

impl AppointmentScreen for DoctorView<'_> {
    fn role(&self) -> Role {
        Role::Doctor
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn quote(&self) -> &'static str {
        self.quote
    }

    fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    fn refresh(&mut self) -> Result<(), FlowError> {
        self.appointments = self.store.list_for_role(Role::Doctor, "")?;
        Ok(())
    }

    fn remove<F>(&mut self, selected: Option<i64>, confirm: F) -> Result<RemoveOutcome, FlowError>
    where
        F: FnOnce(&Appointment) -> bool,
    {
        let outcome = remove_selected(self.store, &self.appointments, selected, confirm)?;
        if matches!(outcome, RemoveOutcome::Removed(_)) {
            self.refresh()?;
        }
        Ok(outcome)
    }
}

// ═══════════════════════════════════════════
// Patient view
// ═══════════════════════════════════════════

pub struct PatientView<'s> {
    store: &'s AppointmentStore,
    username: String,
    quote: &'static str,
    pub form: AppointmentForm,
    appointments: Vec<Appointment>,
}

impl<'s> PatientView<'s> {
    pub fn open(store: &'s AppointmentStore, username: &str) -> Result<Self, FlowError> {
        let mut view = Self {
            store,
            username: username.to_string(),
            quote: supportive_quote(),
            form: AppointmentForm::default(),
            appointments: Vec::new(),
        };
        view.refresh()?;
        Ok(view)
    }

    /// Book the appointment described by the form. The list is reloaded
    /// for the typed name before the form is cleared.
    pub fn create(&mut self) -> Result<i64, FlowError> {
        let appointment = self.form.validate()?;
        let id = self.store.insert(&appointment, Role::Patient)?;
        self.refresh()?;
        self.form.clear();
        Ok(id)
    }

    /// Set the name the list is scoped to, then reload.
    pub fn filter_by_name(&mut self, name: &str) -> Result<(), FlowError> {
        self.form.name = name.to_string();
        self.refresh()
    }
}

impl AppointmentScreen for PatientView<'_> {
    fn role(&self) -> Role {
        Role::Patient
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn quote(&self) -> &'static str {
        self.quote
    }

    fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    fn refresh(&mut self) -> Result<(), FlowError> {
        self.appointments = self.store.list_for_role(Role::Patient, &self.form.name)?;
        Ok(())
    }

    fn remove<F>(&mut self, selected: Option<i64>, confirm: F) -> Result<RemoveOutcome, FlowError>
    where
        F: FnOnce(&Appointment) -> bool,
    {
        let outcome = remove_selected(self.store, &self.appointments, selected, confirm)?;
        if matches!(outcome, RemoveOutcome::Removed(_)) {
            self.refresh()?;
        }
        Ok(outcome)
    }
}

// ═══════════════════════════════════════════
// Role dispatch
// ═══════════════════════════════════════════

pub enum AppointmentView<'s> {
    Doctor(DoctorView<'s>),
    Patient(PatientView<'s>),
}

impl<'s> AppointmentView<'s> {
    pub fn open(store: &'s AppointmentStore, user: &AuthenticatedUser) -> Result<Self, FlowError> {
        let view = match user.role {
            Role::Doctor => Self::Doctor(DoctorView::open(store, &user.username)?),
            Role::Patient => Self::Patient(PatientView::open(store, &user.username)?),
        };
        tracing::info!(username = %user.username, role = %user.role, "Appointment screen opened");
        Ok(view)
    }

    /// The booking side of the screen; only patients have one.
    pub fn patient_mut(&mut self) -> Option<&mut PatientView<'s>> {
        match self {
            Self::Patient(view) => Some(view),
            Self::Doctor(_) => None,
        }
    }
}

impl AppointmentScreen for AppointmentView<'_> {
    fn role(&self) -> Role {
        match self {
            Self::Doctor(v) => v.role(),
            Self::Patient(v) => v.role(),
        }
    }

    fn username(&self) -> &str {
        match self {
            Self::Doctor(v) => v.username(),
            Self::Patient(v) => v.username(),
        }
    }

    fn quote(&self) -> &'static str {
        match self {
            Self::Doctor(v) => v.quote(),
            Self::Patient(v) => v.quote(),
        }
    }

    fn appointments(&self) -> &[Appointment] {
        match self {
            Self::Doctor(v) => v.appointments(),
            Self::Patient(v) => v.appointments(),
        }
    }

    fn refresh(&mut self) -> Result<(), FlowError> {
        match self {
            Self::Doctor(v) => v.refresh(),
            Self::Patient(v) => v.refresh(),
        }
    }

    fn remove<F>(&mut self, selected: Option<i64>, confirm: F) -> Result<RemoveOutcome, FlowError>
    where
        F: FnOnce(&Appointment) -> bool,
    {
        match self {
            Self::Doctor(v) => v.remove(selected, confirm),
            Self::Patient(v) => v.remove(selected, confirm),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn store() -> AppointmentStore {
        AppointmentStore::open_in_memory().unwrap()
    }

    fn user(name: &str, role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            username: name.into(),
            role,
        }
    }

    fn fill(form: &mut AppointmentForm, name: &str, contact: &str, date: &str, time: &str) {
        form.name = name.into();
        form.contact = contact.into();
        form.date = date.into();
        form.time = time.into();
    }

    fn patient_books<'s>(store: &'s AppointmentStore, name: &str, contact: &str) -> PatientView<'s> {
        let mut view = PatientView::open(store, "p").unwrap();
        fill(&mut view.form, name, contact, "2024-01-01", "09:00");
        view.create().unwrap();
        view
    }

    #[test]
    fn view_variant_follows_role() {
        let s = store();
        assert!(matches!(
            AppointmentView::open(&s, &user("d", Role::Doctor)).unwrap(),
            AppointmentView::Doctor(_)
        ));
        let mut patient = AppointmentView::open(&s, &user("p", Role::Patient)).unwrap();
        assert!(patient.patient_mut().is_some());
        assert_eq!(patient.title(), "Hi Patient, Welcome to Appointment Manager");
    }

    #[test]
    fn doctor_title_and_no_form() {
        let s = store();
        let mut view = AppointmentView::open(&s, &user("d", Role::Doctor)).unwrap();
        assert_eq!(view.title(), "Hi Doctor, Welcome to Appointment Manager");
        assert!(view.patient_mut().is_none());
    }

    #[test]
    fn quote_comes_from_fixed_set() {
        let s = store();
        let view = DoctorView::open(&s, "d").unwrap();
        assert!(SUPPORTIVE_QUOTES.contains(&view.quote()));
    }

    #[test]
    fn form_defaults_to_now() {
        let form = AppointmentForm::default();
        assert!(form.name.is_empty());
        assert!(chrono::NaiveDate::parse_from_str(&form.date, DATE_FORMAT).is_ok());
        assert!(chrono::NaiveTime::parse_from_str(&form.time, TIME_FORMAT).is_ok());
    }

    #[test]
    fn create_reloads_with_typed_name_then_clears() {
        let s = store();
        let mut view = PatientView::open(&s, "alice").unwrap();
        assert!(view.appointments().is_empty());

        fill(&mut view.form, "Alice", "555", "2024-01-01", "09:00");
        let id = view.create().unwrap();

        assert_eq!(view.appointments().len(), 1);
        assert_eq!(view.appointments()[0].id, id);
        assert_eq!(view.appointments()[0].role, Some(Role::Patient));
        assert!(view.form.name.is_empty());
        assert!(view.form.contact.is_empty());
    }

    #[test]
    fn blank_field_rejected_without_insert() {
        let s = store();
        let mut view = PatientView::open(&s, "alice").unwrap();

        for blank in ["name", "contact", "date", "time"] {
            fill(&mut view.form, "Alice", "555", "2024-01-01", "09:00");
            match blank {
                "name" => view.form.name.clear(),
                "contact" => view.form.contact.clear(),
                "date" => view.form.date.clear(),
                _ => view.form.time.clear(),
            }
            let err = view.create().unwrap_err();
            assert!(matches!(err, FlowError::MissingRequiredField { field } if field == blank));
        }
        assert_eq!(db::count_appointments(s.connection()).unwrap(), 0);
    }

    #[test]
    fn unvalidated_formats_are_accepted() {
        let s = store();
        let mut view = PatientView::open(&s, "alice").unwrap();
        fill(&mut view.form, "Alice", "n/a", "next tuesday", "noon-ish");
        assert!(view.create().is_ok());
    }

    #[test]
    fn whitespace_fields_count_as_present() {
        let s = store();
        let mut view = PatientView::open(&s, "alice").unwrap();
        fill(&mut view.form, " ", " ", "2024-01-01", "09:00");
        view.create().unwrap();
        assert_eq!(s.list_for_role(Role::Patient, " ").unwrap().len(), 1);
    }

    #[test]
    fn patient_list_scoped_to_typed_name() {
        let s = store();
        patient_books(&s, "Alice", "555");
        patient_books(&s, "Bob", "777");

        let mut view = PatientView::open(&s, "anyone").unwrap();
        view.filter_by_name("Alice").unwrap();
        assert_eq!(view.appointments().len(), 1);
        view.filter_by_name("Carol").unwrap();
        assert!(view.appointments().is_empty());
    }

    #[test]
    fn doctor_sees_all_patient_bookings() {
        let s = store();
        patient_books(&s, "Alice", "555");
        patient_books(&s, "Bob", "777");

        let view = DoctorView::open(&s, "drlee").unwrap();
        let names: Vec<_> = view.appointments().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }

    #[test]
    fn remove_without_selection_fails() {
        let s = store();
        patient_books(&s, "Alice", "555");
        let mut view = DoctorView::open(&s, "drlee").unwrap();

        let err = view.remove(None, |_| true).unwrap_err();
        assert!(matches!(err, FlowError::NoSelectionMade));

        // An id not on screen is not a selection either
        let err = view.remove(Some(9999), |_| true).unwrap_err();
        assert!(matches!(err, FlowError::NoSelectionMade));
        assert_eq!(view.appointments().len(), 1);
    }

    #[test]
    fn declined_confirmation_keeps_row() {
        let s = store();
        patient_books(&s, "Alice", "555");
        let mut view = DoctorView::open(&s, "drlee").unwrap();
        let id = view.appointments()[0].id;

        let outcome = view.remove(Some(id), |_| false).unwrap();
        assert_eq!(outcome, RemoveOutcome::Declined);
        assert_eq!(view.appointments().len(), 1);
    }

    #[test]
    fn doctor_remove_deletes_only_selected_duplicate() {
        let s = store();
        patient_books(&s, "Alice", "555");
        patient_books(&s, "Alice", "555");
        let mut view = DoctorView::open(&s, "drlee").unwrap();
        let first = view.appointments()[0].id;

        let mut shown = None;
        let outcome = view
            .remove(Some(first), |a| {
                shown = Some(a.name.clone());
                true
            })
            .unwrap();

        assert!(matches!(outcome, RemoveOutcome::Removed(ref a) if a.id == first));
        assert_eq!(shown.as_deref(), Some("Alice"));
        assert_eq!(view.appointments().len(), 1);
        assert_ne!(view.appointments()[0].id, first);
    }

    #[test]
    fn patient_cancel_reloads_list() {
        let s = store();
        let mut view = patient_books(&s, "Alice", "555");
        view.filter_by_name("Alice").unwrap();
        let id = view.appointments()[0].id;

        let outcome = view.remove(Some(id), |_| true).unwrap();
        assert!(matches!(outcome, RemoveOutcome::Removed(_)));
        assert!(view.appointments().is_empty());
    }

    #[test]
    fn dispatch_through_enum() {
        let s = store();
        patient_books(&s, "Alice", "555");
        let mut view = AppointmentView::open(&s, &user("drlee", Role::Doctor)).unwrap();
        assert_eq!(view.username(), "drlee");
        assert_eq!(view.appointments().len(), 1);

        let id = view.appointments()[0].id;
        view.remove(Some(id), |_| true).unwrap();
        assert!(view.appointments().is_empty());
    }
}
