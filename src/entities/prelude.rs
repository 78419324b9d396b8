pub use super::{
    Diagnosis, DiagnosisImage, DiagnosisSymptom, Disease, DiseaseSymptom, DiseaseTreatment, Farm,
    FarmUnit, Feedback, Notification, Prediction, Symptom, Treatment, User,
};
