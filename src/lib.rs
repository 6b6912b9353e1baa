#[cfg(target_os = "windows")]
mod class_guids;
#[cfg(target_os = "windows")]
pub use class_guids::class_guids_from_name;

#[cfg(target_os = "windows")]
mod device_info_data;
#[cfg(target_os = "windows")]
pub use device_info_data::DeviceInfoData;

#[cfg(target_os = "windows")]
mod device_info_set;
#[cfg(target_os = "windows")]
pub use device_info_set::{DeviceInfoIter, DeviceInfoSet};

#[cfg(target_os = "windows")]
mod errors;
#[cfg(target_os = "windows")]
pub use errors::SetupDiError;

#[cfg(target_os = "windows")]
mod wide_string;

#[cfg(target_os = "windows")]
mod win32_utils;

// re-export the native types and flags callers need to drive the API
#[cfg(target_os = "windows")]
pub use windows_sys::core::GUID;
#[cfg(target_os = "windows")]
pub use windows_sys::Win32::Devices::DeviceAndDriverInstallation::{
    DIGCF_ALLCLASSES, DIGCF_DEFAULT, DIGCF_DEVICEINTERFACE, DIGCF_PRESENT, DIGCF_PROFILE,
    HDEVINFO, SP_DEVINFO_DATA,
};
#[cfg(target_os = "windows")]
pub use windows_sys::Win32::Foundation::HWND;
