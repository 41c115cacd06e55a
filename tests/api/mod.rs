mod country_tests;
mod department_tests;
mod health_tests;
mod job_tests;
mod location_tests;
