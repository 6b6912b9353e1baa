use crate::device_info_data::DeviceInfoData;
use crate::errors::SetupDiError;
use crate::{wide_string, win32_utils};
use windows_sys::core::GUID;
use windows_sys::Win32::Devices::DeviceAndDriverInstallation::{
    SetupDiDestroyDeviceInfoList, SetupDiEnumDeviceInfo, SetupDiGetClassDevsExW, HDEVINFO,
};
use windows_sys::Win32::Foundation::{HWND, INVALID_HANDLE_VALUE};

/// An open device information set: an owned HDEVINFO handle scoping a collection of
/// device information elements on a local or remote machine.
///
/// The set is released on drop via SetupDiDestroyDeviceInfoList unless ownership is
/// transferred out with [`DeviceInfoSet::into_raw_handle`].
pub struct DeviceInfoSet {
    handle: HDEVINFO,
}

impl DeviceInfoSet {
    /// Opens a device information set containing the device information elements that
    /// match `class_guid` (or all classes when `None`) and the optional `enumerator`
    /// filter string (e.g. "USB" or a device instance id, depending on `flags`).
    ///
    /// `hwnd_parent` is the window to parent any UI on (null is allowed), `flags` is a
    /// combination of the DIGCF_* constants, and `machine_name` of `Some` targets a
    /// remote machine instead of the local one.
    pub fn open(
        class_guid: Option<&GUID>,
        enumerator: Option<&str>,
        hwnd_parent: HWND,
        flags: u32,
        machine_name: Option<&str>,
    ) -> Result<DeviceInfoSet, SetupDiError> {
        let class_guid_as_ptr = match class_guid {
            Some(value) => value as *const GUID,
            None => std::ptr::null(),
        };
        //
        // NOTE: critically, the utf16 chars vectors backing the enumerator and machine
        //       name must remain in scope until the native call returns (i.e. after we
        //       create pointers to them); DO NOT move these variables into their
        //       "let ... = match" blocks
        let enumerator_as_utf16_chars: Vec<u16>;
        let enumerator_as_pcwstr = match enumerator {
            Some(value) => {
                enumerator_as_utf16_chars = wide_string::to_utf16_with_nul(value);
                enumerator_as_utf16_chars.as_ptr()
            }
            None => std::ptr::null(),
        };
        let machine_name_as_utf16_chars: Vec<u16>;
        let machine_name_as_pcwstr = match machine_name {
            Some(value) => {
                machine_name_as_utf16_chars = wide_string::to_utf16_with_nul(value);
                machine_name_as_utf16_chars.as_ptr()
            }
            None => std::ptr::null(),
        };

        // the existing-set merge parameter and the reserved parameter are always null
        // see: https://learn.microsoft.com/en-us/windows/win32/api/setupapi/nf-setupapi-setupdigetclassdevsexw
        let handle = unsafe {
            SetupDiGetClassDevsExW(
                class_guid_as_ptr,
                enumerator_as_pcwstr,
                hwnd_parent,
                flags,
                std::ptr::null_mut(),
                machine_name_as_pcwstr,
                std::ptr::null(),
            )
        };
        if handle as isize == INVALID_HANDLE_VALUE as isize {
            let win32_error = win32_utils::get_last_error_as_win32_error();
            return Err(SetupDiError::Win32Error(win32_error.0));
        }

        Ok(DeviceInfoSet { handle })
    }

    /// Returns the device information element at the zero-based `member_index`.
    ///
    /// Indexing past the end of the set fails with ERROR_NO_MORE_ITEMS; callers walking
    /// the set by hand should test for it with [`SetupDiError::is_no_more_items`].
    pub fn enum_device_info(&self, member_index: u32) -> Result<DeviceInfoData<'_>, SetupDiError> {
        let mut devinfo_data = DeviceInfoData::zeroed_devinfo_data();
        //
        // see: https://learn.microsoft.com/en-us/windows/win32/api/setupapi/nf-setupapi-setupdienumdeviceinfo
        let enum_device_info_result = unsafe { SetupDiEnumDeviceInfo(self.handle, member_index, &mut devinfo_data) };
        if enum_device_info_result == 0 {
            let win32_error = win32_utils::get_last_error_as_win32_error();
            return Err(SetupDiError::Win32Error(win32_error.0));
        }

        Ok(DeviceInfoData::from_raw(self.handle, devinfo_data))
    }

    /// Returns an iterator over every device information element in the set, starting
    /// at index 0 and ending cleanly on ERROR_NO_MORE_ITEMS.
    pub fn devices(&self) -> DeviceInfoIter<'_> {
        DeviceInfoIter {
            set: self,
            member_index: 0,
            reached_end: false,
        }
    }

    /// The raw HDEVINFO handle; the set retains ownership.
    pub fn as_raw_handle(&self) -> HDEVINFO {
        self.handle
    }

    /// Releases ownership of the handle to the caller, which becomes responsible for
    /// closing it with SetupDiDestroyDeviceInfoList.
    pub fn into_raw_handle(self) -> HDEVINFO {
        let handle = self.handle;
        std::mem::forget(self);
        handle
    }
}

impl Drop for DeviceInfoSet {
    fn drop(&mut self) {
        let destroy_result = unsafe { SetupDiDestroyDeviceInfoList(self.handle) };
        debug_assert!(destroy_result != 0, "Could not clean up device info set; win32 error: {}", win32_utils::get_last_error_as_win32_error().0);
    }
}

/// Iterator over the device information elements of a [`DeviceInfoSet`].
///
/// Yields an `Err` item for any failure other than ERROR_NO_MORE_ITEMS, which instead
/// ends the iteration.
pub struct DeviceInfoIter<'set> {
    set: &'set DeviceInfoSet,
    member_index: u32,
    reached_end: bool,
}

impl<'set> Iterator for DeviceInfoIter<'set> {
    type Item = Result<DeviceInfoData<'set>, SetupDiError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.reached_end {
            return None;
        }

        let member_index = self.member_index;
        self.member_index += 1;
        match self.set.enum_device_info(member_index) {
            Ok(devinfo_data) => Some(Ok(devinfo_data)),
            Err(error) if error.is_no_more_items() => {
                // out of items to enumerate
                self.reached_end = true;
                None
            }
            Err(error) => Some(Err(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_ne};
    use windows_sys::Win32::Devices::DeviceAndDriverInstallation::{DIGCF_ALLCLASSES, DIGCF_PRESENT};

    fn open_present_devices() -> DeviceInfoSet {
        DeviceInfoSet::open(None, None, std::ptr::null_mut(), DIGCF_ALLCLASSES | DIGCF_PRESENT, None).unwrap()
    }

    // every Windows machine has at least one present devnode (the root devnode)
    #[test]
    fn open_and_enumerate_present_devices() {
        let set = open_present_devices();
        assert!(!set.as_raw_handle().is_null());

        let first_device = set.enum_device_info(0).unwrap();
        assert_eq!(first_device.dev_inst(), first_device.as_raw().DevInst);

        let instance_id = first_device.instance_id().unwrap();
        assert!(!instance_id.is_empty());
    }

    #[test]
    fn indexing_past_the_end_signals_no_more_items() {
        let set = open_present_devices();
        let error = set.enum_device_info(u32::MAX).unwrap_err();
        assert!(error.is_no_more_items());
    }

    #[test]
    fn iterator_visits_the_same_elements_as_manual_indexing() {
        let set = open_present_devices();

        let mut manual_count: u32 = 0;
        loop {
            match set.enum_device_info(manual_count) {
                Ok(_) => manual_count += 1,
                Err(error) => {
                    assert!(error.is_no_more_items());
                    break;
                }
            }
        }

        let iterated_count = set.devices().count() as u32;
        assert_eq!(iterated_count, manual_count);
        assert!(iterated_count > 0);
    }

    #[test]
    fn usb_enumerator_filter_scopes_the_set() {
        let set = DeviceInfoSet::open(None, Some("USB"), std::ptr::null_mut(), DIGCF_ALLCLASSES | DIGCF_PRESENT, None).unwrap();
        for device in set.devices() {
            let instance_id = device.unwrap().instance_id().unwrap();
            assert!(instance_id.to_ascii_uppercase().starts_with("USB"));
        }
    }

    #[test]
    fn class_guid_filter_yields_elements_of_that_class() {
        let class_guids = crate::class_guids_from_name("System", None).unwrap();
        let class_guid = class_guids.first().unwrap();
        let set = DeviceInfoSet::open(Some(class_guid), None, std::ptr::null_mut(), DIGCF_PRESENT, None).unwrap();
        for device in set.devices() {
            let device = device.unwrap();
            let device_class_guid = device.class_guid();
            assert_eq!(device_class_guid.data1, class_guid.data1);
            assert_eq!(device_class_guid.data2, class_guid.data2);
            assert_eq!(device_class_guid.data3, class_guid.data3);
            assert_eq!(device_class_guid.data4, class_guid.data4);
        }
    }

    #[test]
    fn into_raw_handle_transfers_cleanup_responsibility() {
        let set = open_present_devices();
        let handle = set.into_raw_handle();
        let destroy_result = unsafe { SetupDiDestroyDeviceInfoList(handle) };
        assert_ne!(destroy_result, 0);
    }
}
