//! Database API
//!
//! Owns the database bytes (either read into memory or memory-mapped),
//! decodes the header once, and answers country lookups.
//!
//! The index views are rebuilt from the stored layout on each lookup. They
//! only borrow the buffer, so a `Database` can be shared across threads
//! without locking.

use crate::error::{Result, SxGeoError};
use crate::sxgeo::{parse_ipv4, Layout, SearchEngine, SxGeoHeader};
use crate::validation::{validate_bytes, ValidationLevel};
use memmap2::Mmap;
use std::fmt;
use std::fs::File;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

/// Storage for database data - either owned or memory-mapped
enum DatabaseStorage {
    Owned(Vec<u8>),
    Mmap(Mmap),
}

impl DatabaseStorage {
    fn as_slice(&self) -> &[u8] {
        match self {
            DatabaseStorage::Owned(v) => v.as_slice(),
            DatabaseStorage::Mmap(m) => &m[..],
        }
    }
}

/// Country database loaded from an SxGeo file
///
/// # Examples
///
/// ```no_run
/// use sxgeo::Database;
///
/// let db = Database::open("SxGeo.dat")?;
/// let code = db.lookup("188.163.89.66")?;
/// println!("country: {}", code);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Database {
    data: DatabaseStorage,
    header: SxGeoHeader,
    layout: Layout,
}

impl Database {
    /// Open a database file using memory mapping
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from(path).open()
    }

    /// Start configuring how a database file is loaded
    ///
    /// ```no_run
    /// use sxgeo::{Database, ValidationLevel};
    ///
    /// let db = Database::from("SxGeo.dat")
    ///     .mmap(false)
    ///     .validate(ValidationLevel::Strict)
    ///     .open()?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from<P: AsRef<Path>>(path: P) -> DatabaseOpener {
        DatabaseOpener::new(path)
    }

    /// Create a database from a buffer that is already in memory
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_storage(DatabaseStorage::Owned(data))
    }

    fn from_storage(storage: DatabaseStorage) -> Result<Self> {
        let data = storage.as_slice();
        let header = SxGeoHeader::parse(data)?;
        let layout = header.layout(data.len())?;

        // Build the views once so count mismatches fail here, not on first lookup
        SearchEngine::from_buffer(data, &header, &layout)?;

        log::debug!(
            "loaded SxGeo v{} ({} bytes): {} first-level, {} main index, {} ranges of {} bytes",
            header.version,
            data.len(),
            header.first_index_count,
            header.main_index_count,
            header.ranges_count,
            layout.block_size
        );
        if layout.end() < data.len() {
            log::debug!(
                "{} bytes after the range table are not used for country lookups",
                data.len() - layout.end()
            );
        }

        Ok(Self {
            data: storage,
            header,
            layout,
        })
    }

    /// Look up the country code for a dotted-quad IPv4 address
    ///
    /// Returns the empty string for ranges the database marks as unknown
    /// (country id 0).
    pub fn lookup(&self, query: &str) -> Result<&'static str> {
        let ip = parse_ipv4(query)?;
        self.lookup_ip(ip)
    }

    /// Look up the country code for an address
    pub fn lookup_ip(&self, ip: Ipv4Addr) -> Result<&'static str> {
        self.engine()?.lookup(ip)
    }

    /// Look up the raw country id for an address
    pub fn country_id(&self, ip: Ipv4Addr) -> Result<u8> {
        self.engine()?.country_id(ip)
    }

    /// Look up both the raw country id and its alpha-2 code
    pub fn resolve(&self, ip: Ipv4Addr) -> Result<(u8, &'static str)> {
        self.engine()?.resolve(ip)
    }

    /// Search engine borrowing this database's buffer
    ///
    /// The views are rebuilt on every call. Rebuilding is constant time:
    /// slice bounds and entry counts are compared against the layout
    /// computed at load, and no table is scanned. The views borrow the
    /// buffer, so they cannot be stored next to it in `Database`.
    pub fn engine(&self) -> Result<SearchEngine<'_>> {
        SearchEngine::from_buffer(self.data.as_slice(), &self.header, &self.layout)
    }

    /// Decoded header
    pub fn header(&self) -> &SxGeoHeader {
        &self.header
    }

    /// Section boundaries
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Size of the database in bytes
    pub fn size(&self) -> usize {
        self.data.as_slice().len()
    }

    /// True if the database is memory-mapped rather than owned
    pub fn is_mmap(&self) -> bool {
        matches!(self.data, DatabaseStorage::Mmap(_))
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("size", &self.size())
            .field("mmap", &self.is_mmap())
            .field("header", &self.header)
            .finish()
    }
}

/// Fluent loader for database files
#[derive(Debug, Clone)]
pub struct DatabaseOpener {
    path: PathBuf,
    use_mmap: bool,
    validation: Option<ValidationLevel>,
}

impl DatabaseOpener {
    fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            use_mmap: true,
            validation: None,
        }
    }

    /// Memory-map the file (default) or read it fully into memory
    pub fn mmap(mut self, enabled: bool) -> Self {
        self.use_mmap = enabled;
        self
    }

    /// Run a structural validation pass before accepting the file
    pub fn validate(mut self, level: ValidationLevel) -> Self {
        self.validation = Some(level);
        self
    }

    /// Load the database
    pub fn open(self) -> Result<Database> {
        let path = self.path.display();
        let storage = if self.use_mmap {
            let file = File::open(&self.path)
                .map_err(|e| SxGeoError::Io(format!("Failed to open {}: {}", path, e)))?;
            let mmap = unsafe { Mmap::map(&file) }
                .map_err(|e| SxGeoError::Io(format!("Failed to mmap {}: {}", path, e)))?;
            DatabaseStorage::Mmap(mmap)
        } else {
            let bytes = std::fs::read(&self.path)
                .map_err(|e| SxGeoError::Io(format!("Failed to read {}: {}", path, e)))?;
            DatabaseStorage::Owned(bytes)
        };

        if let Some(level) = self.validation {
            let report = validate_bytes(storage.as_slice(), level);
            if let Some(first) = report.errors.first() {
                return Err(SxGeoError::malformed(format!(
                    "{} failed validation ({} errors): {}",
                    path,
                    report.errors.len(),
                    first
                )));
            }
        }

        Database::from_storage(storage)
    }
}
