/*!
 * Tests for error types and conversions
 */

use sccfix::errors::{AppError, CorrectionError, ResultChannelError, StorageError};

#[test]
fn test_correctionError_kinds_shouldBeStable() {
    assert_eq!(CorrectionError::Validation(String::new()).kind(), "validation");
    assert_eq!(CorrectionError::Format(String::new()).kind(), "format");
    assert_eq!(CorrectionError::OutOfSpec(String::new()).kind(), "out_of_spec");
    assert_eq!(CorrectionError::NoCorrectionNeeded(String::new()).kind(), "no_correction_needed");
}

#[test]
fn test_correctionError_outOfSpec_shouldDisplayCorrectly() {
    let error = CorrectionError::OutOfSpec("SCC starts at 02:30:00:00".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Out of spec"));
    assert!(display.contains("02:30:00:00"));
}

#[test]
fn test_appError_fromCorrectionError_shouldKeepKind() {
    let error: AppError = CorrectionError::Format("line 3".to_string()).into();
    assert!(matches!(error, AppError::Correction(CorrectionError::Format(_))));
    assert_eq!(error.kind(), "format");
}

#[test]
fn test_appError_fromStorageError_shouldReportStorageKind() {
    let error: AppError = StorageError::NotFound("s3://b/k.scc".to_string()).into();
    assert_eq!(error.kind(), "storage");
    assert!(error.to_string().contains("s3://b/k.scc"));
}

#[test]
fn test_resultChannelError_rejected_shouldDisplayStatusAndMessage() {
    let error = ResultChannelError::Rejected {
        status_code: 503,
        message: "unavailable".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("503"));
    assert!(display.contains("unavailable"));
}

#[test]
fn test_appError_fromIoError_shouldBeFileError() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: AppError = io.into();
    assert!(matches!(error, AppError::File(_)));
}

#[test]
fn test_appError_fromAnyhow_shouldBeUnknown() {
    let error: AppError = anyhow::anyhow!("surprise").into();
    assert!(matches!(error, AppError::Unknown(msg) if msg == "surprise"));
}
