use anchor_lang::error::{Error, ERROR_CODE_OFFSET};

use crate::CoreError;

pub(crate) fn assert_core_error(err: Error, expected: CoreError) {
    let code = match err {
        Error::AnchorError(err) => err.error_code_number,
        Error::ProgramError(err) => panic!("expected an anchor error, got {err:?}"),
    };
    assert_eq!(code, expected as u32 + ERROR_CODE_OFFSET);
}
