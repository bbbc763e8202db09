/// fontreg-core: the quiet caretaker of the system font drawer
///
/// Installing a font is more than copying a file. The payload has to land in
/// the system fonts directory, the OS has to learn the font's display name,
/// and every running application deserves a tap on the shoulder saying the
/// font table just changed. Uninstalling walks the same road backwards.
///
/// ## Two Operations, Done Carefully
///
/// **Install**: copy, name, register, announce
/// - Skips fonts whose file name is already present (no overwrite mode)
/// - Reads the family name from the font's own `name` table
/// - Labels TrueType payloads with the " (TrueType)" suffix the OS expects
///
/// **Uninstall**: withdraw, delete, sweep, announce
/// - Accepts bare file names or full paths interchangeably
/// - Sweeps every registration record pointing at the file (a linear scan,
///   because records are keyed by display name, not by file name)
///
/// ## A Sample Session
///
/// ```rust,no_run
/// use fontreg_core::manager::Batch;
/// use fontreg_core::memory::CollectingReporter;
/// use fontreg_core::platform::system_manager;
/// use fontreg_core::settings::Settings;
///
/// let settings = Settings::from_env();
/// let mut manager = system_manager(&settings)?;
///
/// let batch = Batch::new()
///     .with_install(vec!["./Sample-Regular.ttf".to_string()])
///     .with_uninstall(vec!["Retired.otf".to_string()]);
///
/// let mut reporter = CollectingReporter::default();
/// for (target, outcome) in manager.run_batch(&batch, &mut reporter) {
///     println!("{target}: {outcome}");
/// }
/// #
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// ## The Cast of Characters
///
/// - [`manager::FontManager`]: orchestrates install, uninstall, batches and audits
/// - [`store::RegistrationStore`]: display name → file name records
/// - [`resources::FontResources`]: the OS graphics subsystem's font table
/// - [`notify::ChangeNotifier`]: the "fonts changed" broadcast
/// - [`outcome::Outcome`]: what happened to each requested font
///
/// ---
///
/// Crafted with care at FontLab https://www.fontlab.com/

pub mod directory;
pub mod font;
pub mod manager;
pub mod memory;
pub mod metadata;
pub mod notify;
pub mod outcome;
pub mod output;
pub mod platform;
pub mod resources;
pub mod settings;
pub mod store;
