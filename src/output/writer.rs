use super::format;
use crate::error::{Error, Result};
use crate::model::{Domain, Field};
use mpi::collective::SystemOperation;
use mpi::ffi;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;
use std::ffi::CString;
use std::os::raw::{c_int, c_void};

/// Writes one snapshot of the interior cells into the shared file.
///
/// Every rank formats its own planes (sequentially or on a thread pool),
/// computes its byte offset as the exclusive prefix sum of the per-rank
/// byte counts, and issues a single collective write over its disjoint
/// range. At t == 0 the file is recreated; later snapshots append after
/// the current end of the file.
pub fn write_snapshot(
    comm: &SimpleCommunicator,
    domain: &Domain,
    t: f64,
    dx: f64,
    field: &Field,
    filename: &str,
    hybrid: bool,
) -> Result<()> {
    if comm.rank() == 0 {
        println!("Computation is at time {}", t);
    }
    let text = if hybrid {
        format::format_snapshot_hybrid(field, t, dx, domain.ioffset)
    } else {
        format::format_snapshot(field, t, dx, domain.ioffset)
    };
    debug_assert_eq!(
        text.len(),
        format::snapshot_len(domain.ni, domain.nj, domain.nk)
    );

    let numchars = text.len() as i64;
    let mut offset: i64 = 0;
    comm.exclusive_scan_into(&numchars, &mut offset, SystemOperation::sum());
    if comm.rank() == 0 {
        offset = 0;
    }

    let mut file = if t == 0.0 {
        if comm.rank() == 0 && std::path::Path::new(filename).exists() {
            std::fs::remove_file(filename)
                .map_err(|e| Error::io_error(filename, &e.to_string()))?;
        }
        comm.barrier();
        SharedFile::create(comm, filename)?
    } else {
        let file = SharedFile::append(comm, filename)?;
        offset += file.size()?;
        file
    };
    file.write_at_all(offset, text.as_bytes())?;
    file.close()
}

/// Thin wrapper over the MPI-IO file handle; rsmpi has no safe MPI-IO
/// layer, so the calls go through `mpi::ffi` directly.
struct SharedFile {
    handle: ffi::MPI_File,
    path: String,
}

impl SharedFile {
    fn create(comm: &SimpleCommunicator, path: &str) -> Result<Self> {
        Self::open(
            comm,
            path,
            (ffi::MPI_MODE_CREATE | ffi::MPI_MODE_WRONLY) as c_int,
        )
    }

    fn append(comm: &SimpleCommunicator, path: &str) -> Result<Self> {
        Self::open(
            comm,
            path,
            (ffi::MPI_MODE_APPEND | ffi::MPI_MODE_WRONLY) as c_int,
        )
    }

    fn open(comm: &SimpleCommunicator, path: &str, amode: c_int) -> Result<Self> {
        let cpath = CString::new(path)
            .map_err(|_| Error::io_error(path, "file name contains a NUL byte"))?;
        let mut handle: ffi::MPI_File = unsafe { std::mem::zeroed() };
        let code = unsafe {
            ffi::MPI_File_open(
                comm.as_raw(),
                cpath.as_ptr(),
                amode,
                ffi::RSMPI_INFO_NULL,
                &mut handle,
            )
        };
        if code != ffi::MPI_SUCCESS as c_int {
            return Err(Error::mpi_error(
                code,
                &format!("MPI_File_open failed for '{}'", path),
            ));
        }
        Ok(Self {
            handle,
            path: path.to_string(),
        })
    }

    fn size(&self) -> Result<i64> {
        let mut size: ffi::MPI_Offset = 0;
        let code = unsafe { ffi::MPI_File_get_size(self.handle, &mut size) };
        if code != ffi::MPI_SUCCESS as c_int {
            return Err(Error::mpi_error(
                code,
                &format!("MPI_File_get_size failed for '{}'", self.path),
            ));
        }
        Ok(size as i64)
    }

    fn write_at_all(&mut self, offset: i64, data: &[u8]) -> Result<()> {
        let code = unsafe {
            ffi::MPI_File_write_at_all(
                self.handle,
                offset as ffi::MPI_Offset,
                data.as_ptr() as *const c_void,
                data.len() as c_int,
                ffi::RSMPI_UINT8_T,
                ffi::RSMPI_STATUS_IGNORE,
            )
        };
        if code != ffi::MPI_SUCCESS as c_int {
            return Err(Error::mpi_error(
                code,
                &format!("MPI_File_write_at_all failed for '{}'", self.path),
            ));
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let code = unsafe { ffi::MPI_File_close(&mut self.handle) };
        if code != ffi::MPI_SUCCESS as c_int {
            return Err(Error::mpi_error(
                code,
                &format!("MPI_File_close failed for '{}'", self.path),
            ));
        }
        Ok(())
    }
}
