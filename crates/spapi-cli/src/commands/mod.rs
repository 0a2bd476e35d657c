pub mod canonicalize;
pub mod fingerprint;
pub mod get;
pub mod list;
pub mod parse_report;
pub mod reconcile;
pub mod sign;
pub mod verify;

use spapi_canonical::HashProfile;

pub(crate) fn profile(deep: bool) -> HashProfile {
    if deep {
        HashProfile::Deep
    } else {
        HashProfile::Shallow
    }
}
