//! The descriptor validation chain.

use dodo::{
    Code, Policy, Status, check_aligned, check_not_null, check_range, invariant, require,
    try_status,
};
use tracing::debug;

use crate::config::LoadLimits;
use crate::descriptor::{ModuleDescriptor, ModuleFlags};
use crate::memory::MemoryMap;

/// Validate `descriptor` against `limits` and `memory`.
///
/// Returns Ok when the module may be mapped, otherwise the status produced
/// by the policy's fallback for the first failing check. A descriptor aimed
/// at a reserved window is an ordinary `OutOfRange` rejection.
///
/// Never returns if the page alignment is not a power of two or the memory
/// map refuses a region it did not report as reserved; both mean the loader
/// itself is inconsistent.
pub fn validate_and_load(
    policy: &Policy,
    descriptor: Option<&ModuleDescriptor>,
    limits: &LoadLimits,
    memory: &dyn MemoryMap,
) -> Status {
    let Some(module) = descriptor else {
        return check_not_null!(policy; descriptor, Code::NullPointer);
    };

    try_status!(check_not_null!(policy; module.name, Code::NullPointer));
    try_status!(check_range!(policy; module.size, limits.min_size, limits.max_size, Code::OutOfRange));

    invariant!(policy; limits.page_alignment.is_power_of_two(), Code::InvariantBroken);
    try_status!(check_aligned!(policy; module.load_address, limits.page_alignment, Code::Misaligned));

    try_status!(require!(policy; module.flags.contains(ModuleFlags::SIGNED), Code::PreconditionFailed));

    try_status!(require!(
        policy;
        !memory.is_reserved(module.load_address, module.size),
        Code::OutOfRange
    ));

    invariant!(
        policy;
        memory.is_region_available(module.load_address, module.size),
        Code::InvariantBroken
    );

    debug!(module = module.display_name(), "descriptor accepted");
    Status::ok_status()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::AlwaysAvailable;
    use dodo::FailureContext;
    use std::sync::Mutex;

    fn signed(name: &str, size: usize, addr: usize) -> ModuleDescriptor {
        ModuleDescriptor::new(Some(name), size, addr, ModuleFlags::SIGNED).unwrap()
    }

    #[test]
    fn well_formed_descriptor_is_accepted() {
        let policy = Policy::new();
        let d = signed("StorageCtl", 64 * 1024, 0x20_0000);
        assert!(validate_and_load(&policy, Some(&d), &LoadLimits::default(), &AlwaysAvailable).ok());
    }

    #[test]
    fn missing_descriptor_reports_null_pointer_once() {
        static HITS: Mutex<Vec<Code>> = Mutex::new(Vec::new());
        fn record(ctx: &FailureContext) -> Status {
            HITS.lock().unwrap().push(ctx.code());
            Status::fail(ctx.code())
        }
        let policy = Policy::new().with_fallback_handler(record);

        let s = validate_and_load(&policy, None, &LoadLimits::default(), &AlwaysAvailable);
        assert_eq!(s.code(), Code::NullPointer);
        assert_eq!(*HITS.lock().unwrap(), vec![Code::NullPointer]);
    }

    #[test]
    fn missing_name_wins_over_later_checks() {
        static HITS: Mutex<Vec<Code>> = Mutex::new(Vec::new());
        fn record(ctx: &FailureContext) -> Status {
            HITS.lock().unwrap().push(ctx.code());
            Status::fail(ctx.code())
        }
        let policy = Policy::new().with_fallback_handler(record);

        // Oversized, misaligned and unsigned as well; only the name is reported.
        let d = ModuleDescriptor::new(None, usize::MAX, 0x1235, ModuleFlags::empty()).unwrap();
        let s = validate_and_load(&policy, Some(&d), &LoadLimits::default(), &AlwaysAvailable);
        assert_eq!(s.code(), Code::NullPointer);
        assert_eq!(*HITS.lock().unwrap(), vec![Code::NullPointer]);
    }

    #[test]
    fn size_bounds_are_inclusive() {
        let policy = Policy::new();
        let limits = LoadLimits::default();
        let check = |size| {
            validate_and_load(&policy, Some(&signed("m", size, 0x1000)), &limits, &AlwaysAvailable)
        };
        assert_eq!(check(0).code(), Code::OutOfRange);
        assert!(check(limits.min_size).ok());
        assert!(check(limits.max_size).ok());
        assert_eq!(check(limits.max_size + 1).code(), Code::OutOfRange);
    }

    #[test]
    fn network_card_is_misaligned() {
        let policy = Policy::new();
        let d = signed("NetworkCard", 1024, 0x1235);
        let s = validate_and_load(&policy, Some(&d), &LoadLimits::default(), &AlwaysAvailable);
        assert_eq!(s.code(), Code::Misaligned);
    }

    #[test]
    fn unsigned_module_fails_precondition() {
        let policy = Policy::new();
        let d = ModuleDescriptor::new(Some("Blob"), 4096, 0x3000, ModuleFlags::EXECUTABLE).unwrap();
        let s = validate_and_load(&policy, Some(&d), &LoadLimits::default(), &AlwaysAvailable);
        assert_eq!(s.code(), Code::PreconditionFailed);
    }

    #[test]
    fn reserved_window_is_a_recoverable_rejection() {
        use crate::memory::{Region, ReservedRegions};

        let policy = Policy::new();
        let memory = ReservedRegions::from_regions([Region::new(0xf000_0000, 0x1000_0000)]).unwrap();
        let limits = LoadLimits::default();

        let inside = signed("Firmware", 4096, 0xf000_0000);
        let straddling = signed("Straddle", 0x2000, 0xefff_f000);
        let clear = signed("StorageCtl", 4096, 0x20_0000);
        assert_eq!(validate_and_load(&policy, Some(&inside), &limits, &memory).code(), Code::OutOfRange);
        assert_eq!(validate_and_load(&policy, Some(&straddling), &limits, &memory).code(), Code::OutOfRange);
        assert!(validate_and_load(&policy, Some(&clear), &limits, &memory).ok());
    }

    #[test]
    fn fallback_may_accept_a_rejection() {
        fn waive_signature(ctx: &FailureContext) -> Status {
            if ctx.code() == Code::PreconditionFailed {
                Status::ok_status()
            } else {
                Status::fail(ctx.code())
            }
        }
        let policy = Policy::new().with_fallback_handler(waive_signature);
        let d = ModuleDescriptor::new(Some("Blob"), 4096, 0x3000, ModuleFlags::empty()).unwrap();
        assert!(validate_and_load(&policy, Some(&d), &LoadLimits::default(), &AlwaysAvailable).ok());
    }
}
