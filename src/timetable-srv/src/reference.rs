use crate::schema::{Department, Staff};
use crate::store::TimetableStore;
use serde::Serialize;

/// The departments + staff used to populate selection controls. Loaded once; a failed or empty load
/// leaves whatever was there before.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceData {
  #[allow(clippy::missing_docs_in_private_items)]
  departments: Vec<Department>,
  #[allow(clippy::missing_docs_in_private_items)]
  staff: Vec<Staff>,
}

impl ReferenceData {
  /// Issues the two read-all queries. Neither depends on the other, and neither failure is surfaced
  /// beyond the logs.
  pub async fn load<S>(&mut self, store: &S)
  where
    S: TimetableStore,
  {
    match store.departments().await {
      Ok(departments) if departments.is_empty() => log::warn!("store returned no departments"),
      Ok(departments) => {
        log::info!("loaded {} department(s)", departments.len());
        self.departments = departments;
      }
      Err(error) => log::warn!("unable to load departments - {error}"),
    }

    match store.staff().await {
      Ok(staff) if staff.is_empty() => log::warn!("store returned no staff"),
      Ok(staff) => {
        log::info!("loaded {} staff member(s)", staff.len());
        self.staff = staff;
      }
      Err(error) => log::warn!("unable to load staff - {error}"),
    }
  }

  /// Every department, in store order.
  pub fn departments(&self) -> &[Department] {
    self.departments.as_slice()
  }

  /// Every staff member, in store order.
  pub fn staff(&self) -> &[Staff] {
    self.staff.as_slice()
  }

  /// Finds a staff member by id, or by their name ignoring case.
  pub fn find_staff<S>(&self, needle: S) -> Option<&Staff>
  where
    S: AsRef<str>,
  {
    let needle = needle.as_ref().trim();
    self
      .staff
      .iter()
      .find(|staff| staff.id.as_str() == needle)
      .or_else(|| self.staff.iter().find(|staff| staff.name.eq_ignore_ascii_case(needle)))
  }

  /// Finds a department by id, or by its name ignoring case.
  pub fn find_department<S>(&self, needle: S) -> Option<&Department>
  where
    S: AsRef<str>,
  {
    let needle = needle.as_ref().trim();
    self
      .departments
      .iter()
      .find(|department| department.id.as_str() == needle)
      .or_else(|| {
        self
          .departments
          .iter()
          .find(|department| department.name.eq_ignore_ascii_case(needle))
      })
  }
}
