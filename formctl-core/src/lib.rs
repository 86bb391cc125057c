pub mod calendar;
pub mod clock;
pub mod config;
pub mod dismiss;
pub mod error;
pub mod picker;
pub mod select;
pub mod table;

pub use calendar::{format_value, month_grid, DateConstraint, DayCell, MonthGrid, MonthView, WeekendRule};
pub use clock::Clock;
pub use config::{PickerOptions, YearLimit};
pub use dismiss::{DismissRegistry, Region, SubscriberId};
pub use error::{FormError, Result};
pub use picker::{DatePicker, HostField, TextField};
pub use select::{SelectEntry, SelectModel};
pub use table::{age_string, Row, TableModel, TableSpec};
