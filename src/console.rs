//! Line-oriented terminal front-end.
//!
//! Renders the entry, sign-up and appointment screens and turns flow
//! errors into blocking notices. Generic over its input and output so
//! the whole interaction can be scripted in tests. End of input quits.

use std::io::{self, BufRead, Write};

use crate::flow::{
    AppointmentScreen, AppointmentView, AuthFlow, AuthenticatedUser, Credentials, FlowError,
    RemoveOutcome,
};
use crate::models::{Appointment, Role};
use crate::store::{AccountStore, AppointmentStore};

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Entry screen loop. Returns when the user quits, leaves the
    /// appointment screen, or input ends.
    pub fn run(&mut self, accounts: &AccountStore, appointments: &AppointmentStore) -> io::Result<()> {
        let mut auth = AuthFlow::new(accounts);

        loop {
            writeln!(self.output, "\n=== Appointment Manager ===")?;
            writeln!(self.output, "[1] Login  [2] Sign up  [q] Quit")?;
            let Some(choice) = self.prompt("> ")? else {
                return Ok(());
            };

            match choice.trim() {
                "1" => {
                    let Some(user) = self.login(&mut auth)? else {
                        continue;
                    };
                    match user.enter(appointments) {
                        Ok(mut view) => return self.appointment_screen(&mut view),
                        Err(e) => self.notice(&e)?,
                    }
                }
                "2" => self.sign_up(&mut auth)?,
                "q" | "Q" => return Ok(()),
                _ => writeln!(self.output, "Unknown choice.")?,
            }
        }
    }

    fn login(&mut self, auth: &mut AuthFlow<'_>) -> io::Result<Option<AuthenticatedUser>> {
        let Some(credentials) = self.read_credentials()? else {
            return Ok(None);
        };
        match auth.login(&credentials) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                self.notice(&e)?;
                auth.reset();
                Ok(None)
            }
        }
    }

    fn sign_up(&mut self, auth: &mut AuthFlow<'_>) -> io::Result<()> {
        writeln!(self.output, "\n--- Sign Up ---")?;
        let Some(credentials) = self.read_credentials()? else {
            return Ok(());
        };
        match auth.sign_up(&credentials) {
            Ok(()) => writeln!(self.output, "Account created successfully!"),
            Err(e) => self.notice(&e),
        }
    }

    fn read_credentials(&mut self) -> io::Result<Option<Credentials>> {
        let Some(username) = self.prompt("Username: ")? else {
            return Ok(None);
        };
        let Some(password) = self.prompt("Password: ")? else {
            return Ok(None);
        };
        let Some(role) = self.prompt_role()? else {
            return Ok(None);
        };
        Ok(Some(Credentials::new(username, password, role)))
    }

    fn prompt_role(&mut self) -> io::Result<Option<Role>> {
        loop {
            let Some(answer) = self.prompt("User type [d]octor / [p]atient (default patient): ")? else {
                return Ok(None);
            };
            match answer.trim().to_ascii_lowercase().as_str() {
                "" | "p" | "patient" => return Ok(Some(Role::Patient)),
                "d" | "doctor" => return Ok(Some(Role::Doctor)),
                _ => writeln!(self.output, "Please answer d or p.")?,
            }
        }
    }

    // ── Appointment screen ──────────────────────────────────

    fn appointment_screen(&mut self, view: &mut AppointmentView<'_>) -> io::Result<()> {
        let title = view.title();
        let quote = view.quote();

        loop {
            writeln!(self.output, "\n=== {title} ===")?;
            self.render_list(view.appointments())?;
            writeln!(self.output, "\n\"{quote}\"")?;

            let verb = match view.role() {
                Role::Doctor => {
                    writeln!(self.output, "[d] Delete appointment  [r] Refresh  [x] Exit")?;
                    "delete"
                }
                Role::Patient => {
                    writeln!(
                        self.output,
                        "[m] Make appointment  [f] Find by name  [c] Cancel appointment  [x] Exit"
                    )?;
                    "cancel"
                }
            };

            let Some(choice) = self.prompt("> ")? else {
                return Ok(());
            };

            let result = match (choice.trim(), view.role()) {
                ("x" | "X", _) => return Ok(()),
                ("r", _) => view.refresh(),
                ("d", Role::Doctor) | ("c", Role::Patient) => match self.remove(view, verb)? {
                    Some(result) => result,
                    None => return Ok(()),
                },
                ("m", Role::Patient) => match self.make_appointment(view)? {
                    Some(result) => result,
                    None => return Ok(()),
                },
                ("f", Role::Patient) => {
                    let Some(name) = self.prompt("Name: ")? else {
                        return Ok(());
                    };
                    match view.patient_mut() {
                        Some(patient) => patient.filter_by_name(&name),
                        None => Ok(()),
                    }
                }
                _ => {
                    writeln!(self.output, "Unknown choice.")?;
                    Ok(())
                }
            };

            if let Err(e) = result {
                self.notice(&e)?;
            }
        }
    }

    /// `None` when input ended mid-form.
    fn make_appointment(
        &mut self,
        view: &mut AppointmentView<'_>,
    ) -> io::Result<Option<Result<(), FlowError>>> {
        let Some(patient) = view.patient_mut() else {
            return Ok(Some(Ok(())));
        };

        let mut form = patient.form.clone();
        let Some(name) = self.prompt_with_default("Name", &form.name)? else {
            return Ok(None);
        };
        let Some(contact) = self.prompt_with_default("Contact", &form.contact)? else {
            return Ok(None);
        };
        let Some(date) = self.prompt_with_default("Date", &form.date)? else {
            return Ok(None);
        };
        let Some(time) = self.prompt_with_default("Time", &form.time)? else {
            return Ok(None);
        };
        form.name = name;
        form.contact = contact;
        form.date = date;
        form.time = time;
        patient.form = form;

        let result = patient.create().map(|id| {
            tracing::debug!(id, "Booked from console");
        });
        if result.is_ok() {
            writeln!(self.output, "Appointment booked.")?;
        }
        Ok(Some(result))
    }

    /// `None` when input ended mid-prompt.
    fn remove(
        &mut self,
        view: &mut AppointmentView<'_>,
        verb: &str,
    ) -> io::Result<Option<Result<(), FlowError>>> {
        let Some(answer) = self.prompt("Index of appointment: ")? else {
            return Ok(None);
        };
        let selected = answer.trim().parse::<i64>().ok();

        let confirmed = match selected.and_then(|id| view.appointments().iter().find(|a| a.id == id)) {
            Some(_) => {
                let Some(reply) = self.prompt(&format!(
                    "Are you sure you want to {verb} this appointment? [y/N] "
                ))?
                else {
                    return Ok(None);
                };
                matches!(reply.trim(), "y" | "Y" | "yes")
            }
            None => false,
        };

        let result = match view.remove(selected, |_| confirmed) {
            Ok(RemoveOutcome::Removed(_)) => {
                writeln!(self.output, "Appointment removed.")?;
                Ok(())
            }
            Ok(RemoveOutcome::Declined) => Ok(()),
            Err(e) => Err(e),
        };
        Ok(Some(result))
    }

    fn render_list(&mut self, rows: &[Appointment]) -> io::Result<()> {
        writeln!(
            self.output,
            "{:<6} {:<20} {:<15} {:<12} {:<6}",
            "Index", "Name", "Contact", "Date", "Time"
        )?;
        if rows.is_empty() {
            return writeln!(self.output, "(no appointments)");
        }
        for a in rows {
            writeln!(
                self.output,
                "{:<6} {:<20} {:<15} {:<12} {:<6}",
                a.id, a.name, a.contact, a.date, a.time
            )?;
        }
        Ok(())
    }

    // ── Primitives ──────────────────────────────────────────

    fn notice(&mut self, error: &FlowError) -> io::Result<()> {
        writeln!(self.output, "! {error}")
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Empty input keeps `current`.
    fn prompt_with_default(&mut self, label: &str, current: &str) -> io::Result<Option<String>> {
        let shown = if current.is_empty() {
            format!("{label}: ")
        } else {
            format!("{label} [{current}]: ")
        };
        Ok(self.prompt(&shown)?.map(|answer| {
            if answer.is_empty() {
                current.to_string()
            } else {
                answer
            }
        }))
    }
}
