pub mod diagnosis;
pub mod diagnosis_image;
pub mod diagnosis_symptom;
pub mod disease;
pub mod disease_symptom;
pub mod disease_treatment;
pub mod farm;
pub mod farm_unit;
pub mod feedback;
pub mod notification;
pub mod prediction;
pub mod symptom;
pub mod treatment;
pub mod user;

pub use diagnosis::Entity as Diagnosis;
pub use diagnosis_image::Entity as DiagnosisImage;
pub use diagnosis_symptom::Entity as DiagnosisSymptom;
pub use disease::Entity as Disease;
pub use disease_symptom::Entity as DiseaseSymptom;
pub use disease_treatment::Entity as DiseaseTreatment;
pub use farm::Entity as Farm;
pub use farm_unit::Entity as FarmUnit;
pub use feedback::Entity as Feedback;
pub use notification::Entity as Notification;
pub use prediction::Entity as Prediction;
pub use symptom::Entity as Symptom;
pub use treatment::Entity as Treatment;
pub use user::Entity as User;

pub mod prelude;
